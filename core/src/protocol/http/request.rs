/*
 * request.rs
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

//! HTTP/1.1 request: verb, path, headers, optional body, serialized to exact wire bytes.
//!
//! Nothing here is parsed or validated. Header lines supplied by the caller are copied
//! verbatim, so duplicates, odd casing and malformed lines reach the wire untouched.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::{BufMut, Bytes, BytesMut};

const CRLF: &[u8] = b"\r\n";

/// Request body. At most one kind per request; the kind selects the default Content-Type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Json(String),
    Form(String),
    Xml(String),
    Yaml(String),
    Raw(String),
}

impl Body {
    /// Content-Type sent when the caller did not supply one.
    pub fn default_content_type(&self) -> &'static str {
        match self {
            Body::Json(_) => "application/json",
            Body::Form(_) => "application/x-www-form-urlencoded",
            Body::Xml(_) => "application/xml",
            Body::Yaml(_) => "application/yaml",
            Body::Raw(_) => "text/plain",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Body::Json(s) | Body::Form(s) | Body::Xml(s) | Body::Yaml(s) | Body::Raw(s) => s,
        }
    }

    /// Short name used in logs and configuration errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Body::Json(_) => "json",
            Body::Form(_) => "form",
            Body::Xml(_) => "xml",
            Body::Yaml(_) => "yaml",
            Body::Raw(_) => "raw",
        }
    }
}

/// Authorization header source. Only one can be set, so only one header is ever emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// `user:pass`, base64-encoded on the wire.
    Basic(String),
    Bearer(String),
}

impl Authorization {
    pub(crate) fn header_value(&self) -> String {
        match self {
            Authorization::Basic(credentials) => {
                format!("Basic {}", BASE64.encode(credentials.as_bytes()))
            }
            Authorization::Bearer(token) => format!("Bearer {}", token),
        }
    }
}

/// Structured description of one raw request.
///
/// Setters return `&mut Self` so they can be chained on a `let mut` binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSpec {
    pub verb: String,
    pub host: String,
    pub path: Option<String>,
    pub cookie: Option<String>,
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
    /// Raw `Name: Value` lines in send order.
    pub headers: Vec<String>,
    pub authorization: Option<Authorization>,
    pub body: Option<Body>,
}

impl RequestSpec {
    pub fn new(verb: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn path(&mut self, path: impl Into<String>) -> &mut Self {
        self.path = Some(path.into());
        self
    }

    pub fn cookie(&mut self, cookie: impl Into<String>) -> &mut Self {
        self.cookie = Some(cookie.into());
        self
    }

    pub fn content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn accept_language(&mut self, accept_language: impl Into<String>) -> &mut Self {
        self.accept_language = Some(accept_language.into());
        self
    }

    /// Append a raw header line. Not parsed; sent exactly as given.
    pub fn header(&mut self, line: impl Into<String>) -> &mut Self {
        self.headers.push(line.into());
        self
    }

    pub fn authorization(&mut self, authorization: Authorization) -> &mut Self {
        self.authorization = Some(authorization);
        self
    }

    pub fn body(&mut self, body: Body) -> &mut Self {
        self.body = Some(body);
        self
    }

    /// Serialize to wire bytes. See [`build`].
    pub fn build(&self) -> WireRequest {
        build(self)
    }

    /// Request target with the default applied and spaces encoded.
    fn target(&self) -> String {
        match self.path.as_deref() {
            Some(p) if !p.is_empty() => p.replace(' ', "%20"),
            _ => "/".to_string(),
        }
    }

    /// Body text, or None when absent or empty.
    fn body_text(&self) -> Option<&str> {
        self.body.as_ref().map(Body::text).filter(|t| !t.is_empty())
    }
}

/// True if a Content-Type is already present, either as the explicit field or
/// as a raw header line containing the case-sensitive literal `Content-Type:`.
pub fn has_content_type(explicit: Option<&str>, headers: &[String]) -> bool {
    explicit.is_some() || headers.iter().any(|h| h.contains("Content-Type:"))
}

/// Final request bytes. Built once, written once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    bytes: Bytes,
}

impl WireRequest {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl fmt::Display for WireRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

fn put_header(out: &mut BytesMut, name: &str, value: &str) {
    out.put_slice(name.as_bytes());
    out.put_slice(b": ");
    out.put_slice(value.as_bytes());
    out.put_slice(CRLF);
}

/// Assemble the request. Header order is fixed: Host, Cookie, Content-Type, User-Agent,
/// Accept-Language, raw headers, Authorization, default Content-Type, Content-Length,
/// Connection.
pub fn build(spec: &RequestSpec) -> WireRequest {
    let body = spec.body_text();
    let mut out = BytesMut::with_capacity(256 + body.map_or(0, str::len));

    out.put_slice(spec.verb.to_uppercase().as_bytes());
    out.put_u8(b' ');
    out.put_slice(spec.target().as_bytes());
    out.put_slice(b" HTTP/1.1\r\n");

    put_header(&mut out, "Host", &spec.host);
    if let Some(cookie) = &spec.cookie {
        put_header(&mut out, "Cookie", cookie);
    }
    if let Some(content_type) = &spec.content_type {
        put_header(&mut out, "Content-Type", content_type);
    }
    if let Some(user_agent) = &spec.user_agent {
        put_header(&mut out, "User-Agent", user_agent);
    }
    if let Some(accept_language) = &spec.accept_language {
        put_header(&mut out, "Accept-Language", accept_language);
    }
    for line in &spec.headers {
        out.put_slice(line.as_bytes());
        out.put_slice(CRLF);
    }
    if let Some(authorization) = &spec.authorization {
        put_header(&mut out, "Authorization", &authorization.header_value());
    }

    if let (Some(text), Some(kind)) = (body, spec.body.as_ref()) {
        if !has_content_type(spec.content_type.as_deref(), &spec.headers) {
            put_header(&mut out, "Content-Type", kind.default_content_type());
        }
        put_header(&mut out, "Content-Length", &text.len().to_string());
    }
    put_header(&mut out, "Connection", "close");
    out.put_slice(CRLF);

    if let Some(text) = body {
        out.put_slice(text.as_bytes());
    }
    WireRequest {
        bytes: out.freeze(),
    }
}
