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

//! WebSocket client: one connection, one handshake, at most one message out, one frame in.
//!
//! `Init → Connecting → Handshaking → Open → Closed`. Any failure moves straight to
//! `Closed`. There are no timeouts: every read blocks until data or end-of-stream.

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::WebSocketConfig;
use crate::error::ProbeError;
use crate::net::Connector;
use crate::protocol::websocket::frame::{decode_frame, encode_frame, new_mask_key, Frame, OP_CLOSE, OP_TEXT};
use crate::protocol::websocket::handshake::{
    build_handshake_request, check_accept, new_key, parse_handshake_response,
};

/// Upper bound of the single handshake read.
const HANDSHAKE_READ: usize = 4096;

const READ_CHUNK: usize = 8192;

/// Client lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Init,
    Connecting,
    Handshaking,
    Open,
    Closed,
}

/// Single-shot WebSocket client over any stream the connector yields.
pub struct WebSocketClient<S> {
    state: State,
    stream: Option<S>,
    read_buf: BytesMut,
}

impl<S> Default for WebSocketClient<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> WebSocketClient<S> {
    pub fn new() -> Self {
        Self {
            state: State::Init,
            stream: None,
            read_buf: BytesMut::with_capacity(READ_CHUNK),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    fn expect(&self, state: State, operation: &'static str) -> Result<(), ProbeError> {
        if self.state == state {
            Ok(())
        } else {
            Err(ProbeError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    /// Record a failure: the client is finished, the stream stays until `close`.
    fn fail<T>(&mut self, err: ProbeError) -> Result<T, ProbeError> {
        self.state = State::Closed;
        Err(err)
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> WebSocketClient<S> {
    /// Open the transport. `Init → Connecting → Handshaking`.
    pub async fn connect<C>(&mut self, connector: &C, host: &str, port: u16) -> Result<(), ProbeError>
    where
        C: Connector<Stream = S>,
    {
        self.expect(State::Init, "connect")?;
        self.state = State::Connecting;
        match connector.connect(host, port).await {
            Ok(stream) => {
                self.stream = Some(stream);
                self.state = State::Handshaking;
                Ok(())
            }
            Err(source) => self.fail(ProbeError::Connection {
                host: host.to_string(),
                port,
                source,
            }),
        }
    }

    /// Send the upgrade request and read the answer once. `Handshaking → Open`.
    pub async fn handshake(
        &mut self,
        host: &str,
        path: &str,
        extra_headers: &[String],
    ) -> Result<(), ProbeError> {
        self.expect(State::Handshaking, "handshake")?;
        let result = self.try_handshake(host, path, extra_headers).await;
        match result {
            Ok(()) => {
                self.state = State::Open;
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    async fn try_handshake(
        &mut self,
        host: &str,
        path: &str,
        extra_headers: &[String],
    ) -> Result<(), ProbeError> {
        let key = new_key()?;
        let request = build_handshake_request(host, path, &key, extra_headers);
        let stream = self.stream_mut("handshake")?;
        stream.write_all(&request).await?;
        stream.flush().await?;
        tracing::debug!(bytes = request.len(), "handshake request sent");

        let mut tmp = [0u8; HANDSHAKE_READ];
        let n = stream.read(&mut tmp).await?;
        let response = parse_handshake_response(&tmp[..n]);
        if !response.switching {
            return Err(ProbeError::Handshake {
                status_line: response.status_line,
            });
        }
        check_accept(response.accept.as_deref(), &key);
        self.read_buf.extend_from_slice(&response.leftover);
        tracing::debug!(status = %response.status_line, "websocket open");
        Ok(())
    }

    /// Send one masked text frame.
    pub async fn send_text(&mut self, text: &str) -> Result<(), ProbeError> {
        self.expect(State::Open, "send")?;
        let result = self.write_frame(OP_TEXT, text.as_bytes()).await;
        if let Err(e) = result {
            return self.fail(e);
        }
        Ok(())
    }

    async fn write_frame(&mut self, opcode: u8, payload: &[u8]) -> Result<(), ProbeError> {
        let mask_key = new_mask_key()?;
        let mut out = BytesMut::with_capacity(14 + payload.len());
        encode_frame(opcode, payload, &mask_key, &mut out);
        let stream = self.stream_mut("send")?;
        stream.write_all(&out).await?;
        stream.flush().await?;
        tracing::debug!(bytes = out.len(), opcode, "frame sent");
        Ok(())
    }

    /// Read exactly one frame. `Ok(None)` when the peer closed before a full frame header.
    pub async fn receive(&mut self) -> Result<Option<Frame>, ProbeError> {
        self.expect(State::Open, "receive")?;
        match self.read_frame().await {
            Ok(frame) => Ok(frame),
            Err(e) => self.fail(e),
        }
    }

    async fn read_frame(&mut self) -> Result<Option<Frame>, ProbeError> {
        loop {
            if let Some(frame) = decode_frame(&mut self.read_buf)? {
                if frame.opcode == OP_CLOSE {
                    tracing::debug!("server sent close frame");
                }
                return Ok(Some(frame));
            }
            let mut tmp = [0u8; READ_CHUNK];
            let stream = self.stream_mut("receive")?;
            let n = stream.read(&mut tmp).await?;
            if n == 0 {
                return if self.read_buf.len() < 2 {
                    tracing::debug!("peer closed before a frame arrived");
                    Ok(None)
                } else {
                    Err(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "connection closed mid-frame",
                    )
                    .into())
                };
            }
            self.read_buf.extend_from_slice(&tmp[..n]);
        }
    }

    /// Shut down the transport if there is one. Safe to call in any state.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                tracing::debug!(error = %e, "shutdown failed");
            }
        }
        self.state = State::Closed;
    }

    fn stream_mut(&mut self, operation: &'static str) -> Result<&mut S, ProbeError> {
        let state = self.state;
        self.stream
            .as_mut()
            .ok_or(ProbeError::InvalidState { operation, state })
    }

    /// Connect, handshake, optionally send, receive one frame. The transport is closed on
    /// every path before this returns.
    pub async fn run<C>(connector: &C, config: &WebSocketConfig) -> Result<String, ProbeError>
    where
        C: Connector<Stream = S>,
    {
        let mut client = Self::new();
        let result = client.exchange(connector, config).await;
        client.close().await;
        result
    }

    async fn exchange<C>(&mut self, connector: &C, config: &WebSocketConfig) -> Result<String, ProbeError>
    where
        C: Connector<Stream = S>,
    {
        self.connect(connector, &config.host, config.port).await?;
        self.handshake(&config.host, config.path(), &config.headers).await?;
        if let Some(message) = &config.message {
            self.send_text(message).await?;
        }
        Ok(self.receive().await?.map(|f| f.text()).unwrap_or_default())
    }
}
