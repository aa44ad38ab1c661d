/*
 * args.rs
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

//! Command-line options, mapped one to one onto `ProbeOptions`.

use clap::{ArgGroup, Parser};
use wireprobe_core::ProbeOptions;

#[derive(Debug, Parser)]
#[command(name = "wireprobe")]
#[command(about = "Send a hand-built HTTP/1.1 request or a single WebSocket message", long_about = None)]
#[command(group(ArgGroup::new("body").args(["json", "form", "xml", "yaml", "raw"]).multiple(false)))]
pub struct Cli {
    /// HTTP verb (ex: post). Sent upper-cased.
    #[arg(short = 'V', long, required_unless_present = "websocket")]
    pub verb: Option<String>,

    /// Host name, used for the connection and the Host header
    #[arg(short = 'H', long)]
    pub host: String,

    /// Path with query string (ex: /login?next=/). Spaces become %20.
    #[arg(short, long)]
    pub path: Option<String>,

    /// Cookie header value (ex: key=value)
    #[arg(short, long)]
    pub cookie: Option<String>,

    /// Content-Type header value; suppresses the body's default
    #[arg(long)]
    pub content_type: Option<String>,

    #[arg(long)]
    pub user_agent: Option<String>,

    #[arg(long)]
    pub accept_language: Option<String>,

    /// Raw header line, sent verbatim (repeatable, ex: -e 'X-Forwarded-For: 127.0.0.1')
    #[arg(short = 'e', long = "header")]
    pub headers: Vec<String>,

    /// Basic credentials as user:pass
    #[arg(long, conflicts_with = "bearer")]
    pub basic_auth: Option<String>,

    /// Bearer token
    #[arg(long)]
    pub bearer: Option<String>,

    /// WebSocket mode: upgrade over TLS, send --message, print one received frame
    #[arg(short, long)]
    pub websocket: bool,

    /// Text message to send in WebSocket mode
    #[arg(short, long, requires = "websocket")]
    pub message: Option<String>,

    /// JSON body (application/json)
    #[arg(long)]
    pub json: Option<String>,

    /// form-urlencoded body
    #[arg(long)]
    pub form: Option<String>,

    /// XML body (application/xml)
    #[arg(long)]
    pub xml: Option<String>,

    /// YAML body (application/yaml)
    #[arg(long)]
    pub yaml: Option<String>,

    /// Raw body (text/plain)
    #[arg(long)]
    pub raw: Option<String>,

    /// Port (default 80, or 443 with --tls or --websocket)
    #[arg(long)]
    pub port: Option<u16>,

    /// Wrap the plain HTTP connection in TLS
    #[arg(long)]
    pub tls: bool,

    /// Print the request bytes and exit without connecting
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn options(&self) -> ProbeOptions {
        ProbeOptions {
            verb: self.verb.clone().unwrap_or_else(|| "GET".to_string()),
            host: self.host.clone(),
            path: self.path.clone(),
            cookie: self.cookie.clone(),
            content_type: self.content_type.clone(),
            user_agent: self.user_agent.clone(),
            accept_language: self.accept_language.clone(),
            headers: self.headers.clone(),
            basic_auth: self.basic_auth.clone(),
            bearer: self.bearer.clone(),
            websocket: self.websocket,
            message: self.message.clone(),
            json: self.json.clone(),
            form: self.form.clone(),
            xml: self.xml.clone(),
            yaml: self.yaml.clone(),
            raw: self.raw.clone(),
            port: self.port,
            tls: self.tls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_headers_in_order() {
        let cli = Cli::try_parse_from([
            "wireprobe", "-V", "get", "-H", "h", "-e", "A: 1", "-e", "a: 2", "-e", "A: 1",
        ])
        .unwrap();
        assert_eq!(cli.options().headers, vec!["A: 1", "a: 2", "A: 1"]);
    }

    #[test]
    fn rejects_two_bodies() {
        let res = Cli::try_parse_from(["wireprobe", "-V", "post", "-H", "h", "--json", "{}", "--raw", "x"]);
        assert!(res.is_err());
    }

    #[test]
    fn verb_optional_in_websocket_mode() {
        assert!(Cli::try_parse_from(["wireprobe", "-H", "h"]).is_err());
        let cli = Cli::try_parse_from(["wireprobe", "-H", "h", "-w", "-m", "hi"]).unwrap();
        let options = cli.options();
        assert!(options.websocket);
        assert_eq!(options.message.as_deref(), Some("hi"));
    }
}
