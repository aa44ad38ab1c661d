/*
 * lib.rs
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

//! Wireprobe core: HTTP/1.1 requests and WebSocket frames built byte by byte.
//!
//! Nothing is delegated to an HTTP library. `protocol::http` turns a `RequestSpec` into
//! the exact bytes written; `protocol::websocket` performs the upgrade handshake and
//! encodes/decodes frames. `net` supplies the TCP/TLS stream both run over.

pub mod config;
pub mod error;
pub mod net;
pub mod protocol;

pub use config::{HttpConfig, ProbeConfig, ProbeOptions, WebSocketConfig};
pub use error::{ConfigError, ProbeError};
pub use net::{Connector, NetConnector, Transport};
