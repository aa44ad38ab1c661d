/*
 * handshake.rs
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

//! WebSocket opening handshake (RFC 6455 §4): GET with Upgrade, look for 101.
//!
//! Acceptance is decided by the literal `101 Switching Protocols` alone. The
//! Sec-WebSocket-Accept header is compared against the expected value only to log a
//! warning; a missing or wrong value does not fail the handshake.

use std::io;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sha1::{Digest, Sha1};

/// Magic string for Sec-WebSocket-Accept (RFC 6455 §4.2.2).
const WS_ACCEPT_MAGIC: &[u8] = b"258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Marker that must appear in the server's response.
pub const SWITCHING_PROTOCOLS: &str = "101 Switching Protocols";

/// Fresh random 16-byte handshake key, base64-encoded. One per connection attempt.
pub fn new_key() -> io::Result<String> {
    let mut raw = [0u8; 16];
    getrandom::getrandom(&mut raw).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    Ok(BASE64.encode(raw))
}

/// Build the HTTP GET request for the handshake. `extra_headers` are raw lines appended
/// after the mandatory upgrade headers, verbatim.
pub fn build_handshake_request(host: &str, path: &str, key: &str, extra_headers: &[String]) -> Vec<u8> {
    let path = if path.is_empty() { "/" } else { path };
    let mut req = Vec::new();
    req.extend_from_slice(b"GET ");
    req.extend_from_slice(path.replace(' ', "%20").as_bytes());
    req.extend_from_slice(b" HTTP/1.1\r\nHost: ");
    req.extend_from_slice(host.as_bytes());
    req.extend_from_slice(b"\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Key: ");
    req.extend_from_slice(key.as_bytes());
    req.extend_from_slice(b"\r\nSec-WebSocket-Version: 13\r\n");
    for line in extra_headers {
        req.extend_from_slice(line.as_bytes());
        req.extend_from_slice(b"\r\n");
    }
    req.extend_from_slice(b"\r\n");
    req
}

/// Expected Sec-WebSocket-Accept: base64(SHA-1(key + magic)).
pub fn compute_expected_accept(key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(key.as_bytes());
    hasher.update(WS_ACCEPT_MAGIC);
    BASE64.encode(hasher.finalize())
}

/// What the client learned from the bytes of the first read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeResponse {
    /// First line of the response, for error reporting.
    pub status_line: String,
    pub switching: bool,
    pub accept: Option<String>,
    /// Bytes after the blank line that ends the response head (early frame data).
    pub leftover: Vec<u8>,
}

fn find_head_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

/// Inspect the handshake response. Only the head is examined; no header validation.
pub fn parse_handshake_response(data: &[u8]) -> HandshakeResponse {
    let head_end = find_head_end(data);
    let head = String::from_utf8_lossy(&data[..head_end.unwrap_or(data.len())]);
    let status_line = head.lines().next().unwrap_or("").to_string();
    let accept = head.lines().skip(1).find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("Sec-WebSocket-Accept")
            .then(|| value.trim().to_string())
    });
    HandshakeResponse {
        switching: head.contains(SWITCHING_PROTOCOLS),
        status_line,
        accept,
        leftover: head_end.map(|i| data[i..].to_vec()).unwrap_or_default(),
    }
}

/// Log (never fail) when the accept value is missing or does not match our key.
pub fn check_accept(accept: Option<&str>, key: &str) -> bool {
    let expected = compute_expected_accept(key);
    match accept {
        Some(a) if a == expected => true,
        Some(a) => {
            tracing::warn!(received = a, expected = %expected, "Sec-WebSocket-Accept mismatch, continuing");
            false
        }
        None => {
            tracing::warn!("Sec-WebSocket-Accept missing, continuing");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_matches_rfc_example() {
        assert_eq!(
            compute_expected_accept("dGhlIHNhbXBsZSBub25jZQ=="),
            "s3pPLMBiTxaQ9kYGzzhZRbK+xOo="
        );
    }

    #[test]
    fn key_is_16_random_bytes() {
        let a = new_key().unwrap();
        let b = new_key().unwrap();
        assert_eq!(BASE64.decode(&a).unwrap().len(), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn request_layout() {
        let req = build_handshake_request("echo.test", "", "KEY==", &["Cookie: a=b".to_string()]);
        assert_eq!(
            String::from_utf8(req).unwrap(),
            "GET / HTTP/1.1\r\n\
             Host: echo.test\r\n\
             Upgrade: websocket\r\n\
             Connection: Upgrade\r\n\
             Sec-WebSocket-Key: KEY==\r\n\
             Sec-WebSocket-Version: 13\r\n\
             Cookie: a=b\r\n\
             \r\n"
        );
    }

    #[test]
    fn parses_101_with_leftover() {
        let data = b"HTTP/1.1 101 Switching Protocols\r\nupgrade: websocket\r\nsec-websocket-accept:  abc= \r\n\r\n\x81\x02hi";
        let resp = parse_handshake_response(data);
        assert!(resp.switching);
        assert_eq!(resp.status_line, "HTTP/1.1 101 Switching Protocols");
        assert_eq!(resp.accept.as_deref(), Some("abc="));
        assert_eq!(resp.leftover, b"\x81\x02hi");
    }

    #[test]
    fn rejects_other_status() {
        let resp = parse_handshake_response(b"HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\n\r\n");
        assert!(!resp.switching);
        assert_eq!(resp.status_line, "HTTP/1.1 403 Forbidden");
        assert!(resp.leftover.is_empty());
    }

    #[test]
    fn accept_check_does_not_fail() {
        let key = "dGhlIHNhbXBsZSBub25jZQ==";
        assert!(check_accept(Some("s3pPLMBiTxaQ9kYGzzhZRbK+xOo="), key));
        assert!(!check_accept(Some("nope"), key));
        assert!(!check_accept(None, key));
    }
}
