/*
 * main.rs
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

//! wireprobe: build one raw HTTP/1.1 request (or one WebSocket exchange), send it,
//! print what comes back. Logs go to stderr; request and response text to stdout.

mod args;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wireprobe_core::protocol::http::send_request;
use wireprobe_core::protocol::websocket::handshake::{build_handshake_request, new_key};
use wireprobe_core::protocol::websocket::WebSocketClient;
use wireprobe_core::{NetConnector, ProbeConfig, ProbeError};

use crate::args::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wireprobe=info,wireprobe_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), ProbeError> {
    match cli.options().into_config()? {
        ProbeConfig::Http(http) => {
            let request = http.request.build();
            println!("{}", request);
            if cli.dry_run {
                return Ok(());
            }
            let connector = if http.tls {
                NetConnector::tls()
            } else {
                NetConnector::plain()
            };
            tracing::info!(host = %http.request.host, port = http.port, tls = http.tls, "sending request");
            let response = send_request(&connector, &http.request.host, http.port, &request).await?;
            println!("{}", String::from_utf8_lossy(&response));
        }
        ProbeConfig::WebSocket(ws) => {
            if cli.dry_run {
                let key = new_key()?;
                let request = build_handshake_request(&ws.host, ws.path(), &key, &ws.headers);
                println!("{}", String::from_utf8_lossy(&request));
                return Ok(());
            }
            tracing::info!(host = %ws.host, port = ws.port, path = ws.path(), "opening websocket");
            let received = WebSocketClient::run(&NetConnector::tls(), &ws).await?;
            println!("{}", received);
        }
    }
    Ok(())
}
