/*
 * http_exchange.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * Plain HTTP probe against a scripted in-memory server: the server must see
 * exactly the built bytes, and the client must return the whole response.
 */

mod common;

use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

use common::CannedConnector;
use wireprobe_core::protocol::http::send_request;
use wireprobe_core::{ProbeConfig, ProbeError, ProbeOptions};

#[tokio::test]
async fn post_json_round_trip() {
    let options = ProbeOptions {
        verb: "post".into(),
        host: "example.test".into(),
        path: Some("/api/items".into()),
        json: Some(r#"{"a": 1}"#.into()),
        ..ProbeOptions::default()
    };
    let ProbeConfig::Http(http) = options.into_config().unwrap() else {
        panic!("expected http mode");
    };
    let request = http.request.build();

    let (client, mut server) = duplex(16 * 1024);
    let expected = request.as_bytes().to_vec();
    let server_task = tokio::spawn(async move {
        let mut got = vec![0u8; expected.len()];
        server.read_exact(&mut got).await.unwrap();
        assert_eq!(got, expected);
        server
            .write_all(b"HTTP/1.1 201 Created\r\nContent-Length: 2\r\n\r\nok")
            .await
            .unwrap();
    });

    let connector = CannedConnector::new(client);
    let response = send_request(&connector, "example.test", http.port, &request)
        .await
        .unwrap();
    server_task.await.unwrap();

    assert_eq!(
        request.to_string(),
        "POST /api/items HTTP/1.1\r\nHost: example.test\r\nContent-Type: application/json\r\nContent-Length: 8\r\nConnection: close\r\n\r\n{\"a\": 1}"
    );
    assert_eq!(
        String::from_utf8_lossy(&response),
        "HTTP/1.1 201 Created\r\nContent-Length: 2\r\n\r\nok"
    );
}

#[tokio::test]
async fn connect_failure_is_reported() {
    let request = wireprobe_core::protocol::http::RequestSpec::new("GET", "down.test").build();
    let err = send_request(&CannedConnector::refusing(), "down.test", 80, &request)
        .await
        .unwrap_err();
    match err {
        ProbeError::Connection { host, port, .. } => {
            assert_eq!(host, "down.test");
            assert_eq!(port, 80);
        }
        other => panic!("unexpected error: {other}"),
    }
}
