/*
 * common/mod.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * Shared helpers for the integration tests: a connector that hands out one
 * in-memory duplex stream instead of opening a socket.
 */

use std::io;
use std::sync::Mutex;

use tokio::io::DuplexStream;
use wireprobe_core::Connector;

pub struct CannedConnector {
    stream: Mutex<Option<DuplexStream>>,
}

impl CannedConnector {
    pub fn new(stream: DuplexStream) -> Self {
        Self {
            stream: Mutex::new(Some(stream)),
        }
    }

    /// Every connect attempt fails.
    pub fn refusing() -> Self {
        Self {
            stream: Mutex::new(None),
        }
    }
}

impl Connector for CannedConnector {
    type Stream = DuplexStream;

    async fn connect(&self, _host: &str, _port: u16) -> io::Result<DuplexStream> {
        self.stream
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::ConnectionRefused, "refused"))
    }
}
