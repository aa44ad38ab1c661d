/*
 * client.rs
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

//! Plain HTTP exchange: write one request, read until the peer closes.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ProbeError;
use crate::net::Connector;
use crate::protocol::http::request::WireRequest;

/// Read chunk size for the response loop.
const READ_CHUNK: usize = 4096;

/// Connect, send `request`, and return every byte the server sent before closing.
/// The transport is shut down before returning, on success and on I/O failure.
pub async fn send_request<C: Connector>(
    connector: &C,
    host: &str,
    port: u16,
    request: &WireRequest,
) -> Result<Vec<u8>, ProbeError> {
    let mut stream = connector
        .connect(host, port)
        .await
        .map_err(|source| ProbeError::Connection {
            host: host.to_string(),
            port,
            source,
        })?;
    let result = exchange(&mut stream, request).await;
    let _ = stream.shutdown().await;
    result
}

/// Write the request and accumulate the response until a zero-length read.
/// There is no length or time bound: a peer that never closes blocks forever.
pub async fn exchange<S>(stream: &mut S, request: &WireRequest) -> Result<Vec<u8>, ProbeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(request.as_bytes()).await?;
    stream.flush().await?;
    tracing::debug!(bytes = request.len(), "request sent");

    let mut response = Vec::new();
    let mut tmp = [0u8; READ_CHUNK];
    loop {
        let n = stream.read(&mut tmp).await?;
        if n == 0 {
            break;
        }
        response.extend_from_slice(&tmp[..n]);
    }
    tracing::debug!(bytes = response.len(), "response received");
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::http::request::RequestSpec;
    use tokio::io::duplex;

    #[tokio::test]
    async fn exchange_reads_until_close() {
        let (mut client, mut server) = duplex(64 * 1024);
        let request = RequestSpec::new("GET", "example.test").build();

        let server_task = tokio::spawn(async move {
            let mut head = Vec::new();
            let mut tmp = [0u8; 1024];
            while !head.ends_with(b"\r\n\r\n") {
                let n = server.read(&mut tmp).await.unwrap();
                assert!(n > 0);
                head.extend_from_slice(&tmp[..n]);
            }
            // larger than one read chunk
            let body = vec![b'z'; READ_CHUNK * 2 + 17];
            server.write_all(b"HTTP/1.1 200 OK\r\n\r\n").await.unwrap();
            server.write_all(&body).await.unwrap();
            head
        });

        let response = exchange(&mut client, &request).await.unwrap();
        let head = server_task.await.unwrap();
        assert_eq!(head, request.as_bytes());
        assert!(response.starts_with(b"HTTP/1.1 200 OK\r\n\r\n"));
        assert_eq!(response.len(), 19 + READ_CHUNK * 2 + 17);
    }
}
