//! Shared fixtures for adapter tests

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use crate::config::{AdapterConfig, Timeouts};
use crate::types::Backend;

pub const TEST_KEY: &str = "test-key-5f3a9c";

/// Adapter config pointing at `base_url`, with a key for hosted backends.
pub fn config_for(backend: Backend, base_url: &str) -> AdapterConfig {
    let config = AdapterConfig::new(backend).with_base_url(base_url);
    if backend.requires_api_key() {
        config.with_api_key(TEST_KEY)
    } else {
        config
    }
}

pub fn short_timeouts(millis: u64) -> Timeouts {
    let limit = Duration::from_millis(millis);
    Timeouts {
        health: limit,
        generate: limit,
        stream: limit,
    }
}

/// An address nothing listens on.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Single-connection server that answers with a chunked response whose
/// body never finishes.
///
/// The returned receiver fires once the client closes the connection.
pub async fn stalling_server(
    content_type: &str,
    chunks: Vec<&'static str>,
) -> (String, oneshot::Receiver<()>) {
    let mut response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: {content_type}\r\ntransfer-encoding: chunked\r\n\r\n"
    );
    for chunk in chunks {
        response.push_str(&format!("{:x}\r\n{}\r\n", chunk.len(), chunk));
    }
    serve_once(Some(response)).await
}

/// Single-connection server that reads the request and never answers.
pub async fn silent_server() -> (String, oneshot::Receiver<()>) {
    serve_once(None).await
}

async fn serve_once(response: Option<String>) -> (String, oneshot::Receiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let (closed_tx, closed_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;

        if let Some(response) = response {
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
        }

        let mut buf = [0u8; 1024];
        loop {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => continue,
            }
        }
        let _ = closed_tx.send(());
    });

    (url, closed_rx)
}

/// Consume request headers and a `content-length` body.
async fn read_request(socket: &mut TcpStream) {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            return;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            return;
        }
        data.extend_from_slice(&buf[..n]);
    }
}
