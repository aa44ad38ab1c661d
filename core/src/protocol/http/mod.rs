/*
 * mod.rs
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

//! Raw HTTP/1.1 client.
//!
//! - `request`: `RequestSpec` to `WireRequest`, header order fixed, raw lines verbatim.
//! - `client`: write the request, read until the server closes. No response parsing.

pub mod client;
pub mod request;

pub use client::send_request;
pub use request::{build, has_content_type, Authorization, Body, RequestSpec, WireRequest};
