/*
 * config.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Wireprobe, a raw HTTP and WebSocket probing client.
 *
 * Wireprobe is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Wireprobe is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Wireprobe.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Probe configuration: the flat option set a front end collects, and the validated
//! per-mode configuration the clients run from.

use crate::error::ConfigError;
use crate::protocol::http::{Authorization, Body, RequestSpec};

pub const HTTP_PORT: u16 = 80;
pub const HTTPS_PORT: u16 = 443;

/// Options as collected from the command line. Nothing here is validated yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeOptions {
    pub verb: String,
    pub host: String,
    pub path: Option<String>,
    pub cookie: Option<String>,
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
    pub headers: Vec<String>,
    /// `user:pass`.
    pub basic_auth: Option<String>,
    pub bearer: Option<String>,
    pub websocket: bool,
    pub message: Option<String>,
    pub json: Option<String>,
    pub form: Option<String>,
    pub xml: Option<String>,
    pub yaml: Option<String>,
    pub raw: Option<String>,
    /// Overrides the mode's default port.
    pub port: Option<u16>,
    /// TLS for plain HTTP. WebSocket mode always uses TLS.
    pub tls: bool,
}

/// Plain HTTP probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub request: RequestSpec,
    pub port: u16,
    pub tls: bool,
}

/// WebSocket probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebSocketConfig {
    pub host: String,
    pub port: u16,
    pub path: Option<String>,
    /// Raw header lines appended to the upgrade request.
    pub headers: Vec<String>,
    /// Sent as one text frame when present.
    pub message: Option<String>,
}

impl WebSocketConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: HTTPS_PORT,
            path: None,
            headers: Vec::new(),
            message: None,
        }
    }

    pub fn path(&self) -> &str {
        match self.path.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => "/",
        }
    }
}

/// Exactly one mode per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeConfig {
    Http(HttpConfig),
    WebSocket(WebSocketConfig),
}

impl ProbeOptions {
    /// Basic credentials win over a bearer token when both are given.
    fn authorization(&self) -> Option<Authorization> {
        match (&self.basic_auth, &self.bearer) {
            (Some(basic), Some(_)) => {
                tracing::warn!("both basic auth and bearer token given, using basic auth");
                Some(Authorization::Basic(basic.clone()))
            }
            (Some(basic), None) => Some(Authorization::Basic(basic.clone())),
            (None, Some(token)) => Some(Authorization::Bearer(token.clone())),
            (None, None) => None,
        }
    }

    fn body(&self) -> Result<Option<Body>, ConfigError> {
        let mut bodies: Vec<Body> = [
            self.json.clone().map(Body::Json),
            self.form.clone().map(Body::Form),
            self.xml.clone().map(Body::Xml),
            self.yaml.clone().map(Body::Yaml),
            self.raw.clone().map(Body::Raw),
        ]
        .into_iter()
        .flatten()
        .collect();
        if bodies.len() > 1 {
            let kinds: Vec<&str> = bodies.iter().map(Body::kind).collect();
            return Err(ConfigError::MultipleBodies(kinds.join(", ")));
        }
        Ok(bodies.pop())
    }

    /// Validate and split into the mode's configuration.
    pub fn into_config(self) -> Result<ProbeConfig, ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        let body = self.body()?;
        let authorization = self.authorization();

        if self.websocket {
            let mut headers = Vec::new();
            if let Some(cookie) = &self.cookie {
                headers.push(format!("Cookie: {}", cookie));
            }
            if let Some(user_agent) = &self.user_agent {
                headers.push(format!("User-Agent: {}", user_agent));
            }
            if let Some(accept_language) = &self.accept_language {
                headers.push(format!("Accept-Language: {}", accept_language));
            }
            headers.extend(self.headers.iter().cloned());
            if let Some(authorization) = &authorization {
                headers.push(format!("Authorization: {}", authorization.header_value()));
            }
            if body.is_some() {
                tracing::warn!("request body is ignored in websocket mode");
            }
            return Ok(ProbeConfig::WebSocket(WebSocketConfig {
                port: self.port.unwrap_or(HTTPS_PORT),
                host: self.host,
                path: self.path,
                headers,
                message: self.message,
            }));
        }

        if self.verb.trim().is_empty() {
            return Err(ConfigError::EmptyVerb);
        }
        let default_port = if self.tls { HTTPS_PORT } else { HTTP_PORT };
        Ok(ProbeConfig::Http(HttpConfig {
            request: RequestSpec {
                verb: self.verb,
                host: self.host,
                path: self.path,
                cookie: self.cookie,
                content_type: self.content_type,
                user_agent: self.user_agent,
                accept_language: self.accept_language,
                headers: self.headers,
                authorization,
                body,
            },
            port: self.port.unwrap_or(default_port),
            tls: self.tls,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(verb: &str, host: &str) -> ProbeOptions {
        ProbeOptions {
            verb: verb.to_string(),
            host: host.to_string(),
            ..ProbeOptions::default()
        }
    }

    #[test]
    fn http_defaults() {
        let ProbeConfig::Http(http) = options("get", "h").into_config().unwrap() else {
            panic!("expected http mode");
        };
        assert_eq!(http.port, 80);
        assert!(!http.tls);
        assert_eq!(http.request.verb, "get");

        let mut opts = options("get", "h");
        opts.tls = true;
        let ProbeConfig::Http(http) = opts.into_config().unwrap() else {
            panic!("expected http mode");
        };
        assert_eq!(http.port, 443);
    }

    #[test]
    fn rejects_empty_verb_and_host() {
        assert_eq!(options("", "h").into_config(), Err(ConfigError::EmptyVerb));
        assert_eq!(options("GET", " ").into_config(), Err(ConfigError::EmptyHost));
    }

    #[test]
    fn rejects_two_bodies() {
        let mut opts = options("POST", "h");
        opts.json = Some("{}".into());
        opts.xml = Some("<a/>".into());
        assert_eq!(
            opts.into_config(),
            Err(ConfigError::MultipleBodies("json, xml".into()))
        );
    }

    #[test]
    fn single_body_selected() {
        let mut opts = options("POST", "h");
        opts.yaml = Some("a: 1".into());
        let ProbeConfig::Http(http) = opts.into_config().unwrap() else {
            panic!("expected http mode");
        };
        assert_eq!(http.request.body, Some(Body::Yaml("a: 1".into())));
    }

    #[test]
    fn basic_auth_wins_over_bearer() {
        let mut opts = options("GET", "h");
        opts.basic_auth = Some("u:p".into());
        opts.bearer = Some("t".into());
        let ProbeConfig::Http(http) = opts.into_config().unwrap() else {
            panic!("expected http mode");
        };
        assert_eq!(http.request.authorization, Some(Authorization::Basic("u:p".into())));
    }

    #[test]
    fn websocket_mode() {
        let mut opts = options("", "ws.test");
        opts.websocket = true;
        opts.cookie = Some("k=v".into());
        opts.headers = vec!["X-A: 1".into()];
        opts.bearer = Some("t".into());
        opts.message = Some("hello".into());
        let ProbeConfig::WebSocket(ws) = opts.into_config().unwrap() else {
            panic!("expected websocket mode");
        };
        assert_eq!(ws.port, 443);
        assert_eq!(ws.path(), "/");
        assert_eq!(ws.headers, vec!["Cookie: k=v", "X-A: 1", "Authorization: Bearer t"]);
        assert_eq!(ws.message.as_deref(), Some("hello"));
    }
}
