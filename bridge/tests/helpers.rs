//! Test helper utilities for bridge integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use bridge::{BridgeConfig, BridgeServer};

pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub type TestSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Start a bridge on an ephemeral port; it runs until the test ends
pub async fn spawn_bridge(config: BridgeConfig) -> (SocketAddr, BridgeServer) {
    let listener = TcpListener::bind(config.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = BridgeServer::new(config);

    let serving = server.clone();
    tokio::spawn(async move { serving.serve(listener, std::future::pending()).await });
    (addr, server)
}

pub async fn connect(addr: SocketAddr) -> TestSocket {
    let (socket, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    socket
}

pub async fn send_json(socket: &mut TestSocket, json: &str) {
    socket.send(Message::Text(json.to_string())).await.unwrap();
}

/// Next text frame parsed as JSON
pub async fn next_json(socket: &mut TestSocket) -> Value {
    loop {
        let frame = timeout(RECV_TIMEOUT, socket.next())
            .await
            .expect("timed out waiting for frame")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// Frames up to and including the first `done`
pub async fn collect_until_done(socket: &mut TestSocket) -> Vec<Value> {
    let mut received = Vec::new();
    loop {
        let value = next_json(socket).await;
        let is_done = value["type"] == "done";
        received.push(value);
        if is_done {
            return received;
        }
    }
}

/// Plain HTTP/1.1 GET; returns the raw response text
pub async fn http_get(addr: SocketAddr, path: &str, origin: Option<&str>) -> String {
    http_request(addr, "GET", path, origin).await
}

/// Plain HTTP/1.1 request without a body; returns the raw response text
pub async fn http_request(addr: SocketAddr, method: &str, path: &str, origin: Option<&str>) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let origin = origin.map(|o| format!("Origin: {o}\r\n")).unwrap_or_default();
    let request = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\n{origin}Connection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    timeout(RECV_TIMEOUT, stream.read_to_end(&mut response))
        .await
        .unwrap()
        .unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

/// Value of `name` in a raw response, matched case-insensitively
pub fn header_value<'a>(response: &'a str, name: &str) -> Option<&'a str> {
    let head = response.split("\r\n\r\n").next()?;
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

pub fn body(response: &str) -> &str {
    response.split_once("\r\n\r\n").map(|(_, body)| body).unwrap_or_default()
}

/// Helper to wait for async conditions with timeout
pub async fn wait_for_condition<F, Fut>(mut condition: F, timeout_ms: u64) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let start = std::time::Instant::now();
    let timeout = Duration::from_millis(timeout_ms);

    loop {
        if condition().await {
            return true;
        }

        if start.elapsed() > timeout {
            return false;
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
