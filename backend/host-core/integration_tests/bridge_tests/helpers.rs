//! Test helpers for bridge integration tests.
//!
//! This module provides utilities for testing the bridge WebSocket server:
//! - Starting a session with a bridge server on an ephemeral port
//! - Sending/receiving JSON frames
//! - Authentication helpers
//! - Connection state checks

use host_core::bridge::{
    AuthHandshake, BridgeHub, BridgeServerHandle, InboundFrame, OutboundFrame, start_bridge_server,
};
use host_core::{Collaborators, HostSession, SessionOptions};

use common::Generation;

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::time::{Duration, timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type TestSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Test constants for authentication
pub const TEST_AUTH_TOKEN: &str = "test-token-12345";

const FRAME_TIMEOUT: Duration = Duration::from_secs(2);

/// Test helper: Start a session and a bridge server bound to an ephemeral port.
pub async fn start_test_host() -> (HostSession, BridgeServerHandle) {
    let hub = BridgeHub::new();
    let session = HostSession::start(
        SessionOptions::default(),
        hub.clone(),
        Collaborators::logging(),
    )
    .await
    .expect("Failed to start session");

    let handle = start_bridge_server(
        0,
        Some(String::from(TEST_AUTH_TOKEN)),
        hub,
        session.mount_feed(),
    )
    .await
    .expect("Failed to start bridge server");

    (session, handle)
}

/// Test helper: Connect to the bridge server and return WebSocket stream.
pub async fn connect_to_server(handle: &BridgeServerHandle) -> TestSocket {
    let url = format!("{}:{}", host_core::BRIDGE_BASE_URL, handle.local_addr().port());
    let (ws_stream, _) = connect_async(&url)
        .await
        .expect("Failed to connect to WebSocket server");
    ws_stream
}

/// Test helper: Send any serializable value as a JSON text frame.
pub async fn send_json<T: Serialize>(ws: &mut TestSocket, value: &T) {
    let text = serde_json::to_string(value).expect("Failed to encode frame");
    ws.send(Message::Text(text.into()))
        .await
        .expect("Failed to send message");
}

/// Test helper: Receive and decode the next outbound frame.
pub async fn receive_frame(ws: &mut TestSocket) -> OutboundFrame {
    loop {
        let msg = timeout(FRAME_TIMEOUT, ws.next())
            .await
            .expect("Timed out waiting for frame")
            .expect("No message received")
            .expect("Error receiving message");

        match msg {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("Failed to decode frame");
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Expected text frame, got {other:?}"),
        }
    }
}

/// Test helper: Skip frames until a mount at `generation` or later arrives.
pub async fn receive_mount_at(ws: &mut TestSocket, generation: Generation) -> OutboundFrame {
    loop {
        let frame = receive_frame(ws).await;
        if let OutboundFrame::Mount {
            generation: mounted,
            ..
        } = frame
        {
            if mounted >= generation {
                return frame;
            }
        }
    }
}

/// Test helper: Send auth handshake and return `(success, error)`.
pub async fn authenticate(ws: &mut TestSocket, token: &str) -> (bool, Option<String>) {
    send_json(
        ws,
        &AuthHandshake {
            token: token.to_string(),
        },
    )
    .await;

    match receive_frame(ws).await {
        OutboundFrame::AuthResult { success, error } => (success, error),
        other => panic!("Expected auth-result, got {other:?}"),
    }
}

/// Test helper: Send a surface message wrapped in an inbound frame.
pub async fn send_inbound(ws: &mut TestSocket, frame: &InboundFrame) {
    send_json(ws, frame).await;
}

/// Test helper: Check if WebSocket connection is closed.
pub async fn is_connection_closed(ws: &mut TestSocket) -> bool {
    match timeout(Duration::from_millis(500), ws.next()).await {
        Err(_) => false,
        Ok(None) => true,
        Ok(Some(Ok(Message::Close(_)))) => true,
        Ok(Some(Ok(_))) => false,
        Ok(Some(Err(_))) => true,
    }
}
