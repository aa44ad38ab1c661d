/*
 * error.rs
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

//! Probe errors. Every variant is terminal for the invocation; nothing is retried.

use std::io;

use thiserror::Error;

use crate::protocol::websocket::client::State;

/// Errors from the HTTP exchange or the WebSocket client.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// TCP connect or TLS negotiation failed.
    #[error("connection to {host}:{port} failed: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Server did not answer the upgrade with 101 Switching Protocols.
    #[error("websocket handshake rejected: {status_line}")]
    Handshake { status_line: String },

    /// Read or write failed on an established connection.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// Client operation called in the wrong state.
    #[error("cannot {operation} in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: State,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Invalid probe configuration, rejected before any connection is opened.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("verb must not be empty")]
    EmptyVerb,

    #[error("host must not be empty")]
    EmptyHost,

    /// More than one of json/form/xml/yaml/raw was supplied.
    #[error("only one body may be given, got {0}")]
    MultipleBodies(String),
}
