//! WebSocket transport for the message bridge.
//!
//! The listener binds to `127.0.0.1` only and rejects non-loopback peers.
//! Every frame is a JSON text message:
//!
//! 1. the client sends an [`AuthHandshake`] and gets an `auth-result`
//! 2. the client sends [`InboundFrame`]s, which are routed through the
//!    [`BridgeHub`]
//! 3. the server pushes the current [`OutboundFrame`] on connect and again
//!    every time the session remounts

use crate::bridge::connection_state::ConnectionState;
use crate::bridge::frame::{AuthHandshake, InboundFrame, OutboundFrame};
use crate::bridge::handle::BridgeServerHandle;
use crate::bridge::hub::{BridgeHub, RouteResult};
use crate::error::bridge::BridgeError;
use crate::BRIDGE_HOSTNAME;

use common::ErrorLocation;

use std::net::SocketAddr;
use std::panic::Location;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn as TokioSpawn;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{WebSocketStream, accept_async};
use uuid::Uuid;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Latest frame to push to every client; `None` until the first mount.
pub type MountFeed = watch::Receiver<Option<OutboundFrame>>;

/// Starts the bridge WebSocket server on `127.0.0.1:<port>`.
///
/// A random token is generated when `auth_token` is `None`; read it back with
/// [`BridgeServerHandle::auth_token`]. Port `0` binds an ephemeral port.
///
/// # Errors
///
/// Returns [`BridgeError::Io`] if the port cannot be bound.
pub async fn start_bridge_server(
    port: u16,
    auth_token: Option<String>,
    hub: BridgeHub,
    mounts: MountFeed,
) -> Result<BridgeServerHandle, BridgeError> {
    let auth_token = auth_token.unwrap_or_else(|| {
        let token = Uuid::new_v4().to_string();
        info!("Generated bridge auth token: {}", token);
        token
    });

    let listener = TcpListener::bind((BRIDGE_HOSTNAME, port)).await?;
    let local_addr = listener.local_addr()?;
    info!("Bridge server listening on {}", local_addr);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let keepalive = shutdown_tx.clone();
    let token = auth_token.clone();

    let task = TokioSpawn(async move {
        let _keepalive = keepalive;
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        info!("Bridge client connecting from {}", addr);
                        let connection = handle_connection(
                            stream,
                            addr,
                            token.clone(),
                            hub.clone(),
                            mounts.clone(),
                            shutdown_rx.clone(),
                        );
                        TokioSpawn(async move {
                            if let Err(e) = connection.await {
                                error!("Bridge connection {} failed: {}", addr, e);
                            }
                        });
                    }
                    Err(e) => warn!("Bridge accept failed: {}", e),
                },
            }
        }
    });

    Ok(BridgeServerHandle {
        local_addr,
        auth_token,
        shutdown: shutdown_tx,
        task,
    })
}

/// Serves one client until it disconnects or the server shuts down.
///
/// Authentication failures close the connection without an error; only
/// transport failures are reported.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    auth_token: String,
    hub: BridgeHub,
    mut mounts: MountFeed,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), BridgeError> {
    if !addr.ip().is_loopback() {
        warn!("Rejected non-loopback bridge connection from {}", addr);
        return Ok(());
    }

    let ws_stream = accept_async(stream)
        .await
        .map_err(|e| BridgeError::Handshake {
            message: format!("WebSocket handshake failed: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let (mut write, mut read) = ws_stream.split();
    let mut state = ConnectionState::new(addr, auth_token);

    match read.next().await {
        Some(Ok(Message::Text(text))) => {
            let presented = serde_json::from_str::<AuthHandshake>(text.as_str())
                .map(|handshake| handshake.token);
            match presented {
                Ok(token) if state.validate_token(&token) => {
                    info!("Bridge client {} authenticated", state.peer());
                    send_frame(
                        &mut write,
                        &OutboundFrame::AuthResult {
                            success: true,
                            error: None,
                        },
                    )
                    .await?;
                }
                Ok(_) => {
                    warn!("Bridge client {} auth failed: invalid token", addr);
                    send_auth_failure(&mut write, "Invalid authentication token").await?;
                    return Ok(());
                }
                Err(_) => {
                    warn!(
                        "Bridge client {} auth failed: first frame was not a handshake",
                        addr
                    );
                    send_auth_failure(&mut write, "First frame must be an auth handshake")
                        .await?;
                    return Ok(());
                }
            }
        }
        Some(Ok(_)) => {
            warn!("Bridge client {} sent a non-text first frame", addr);
            return Ok(());
        }
        Some(Err(e)) => {
            return Err(BridgeError::Read {
                message: format!("Error reading first frame: {e}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        None => {
            warn!("Bridge client {} disconnected before auth", addr);
            return Ok(());
        }
    }

    let current = mounts.borrow_and_update().clone();
    if let Some(frame) = current {
        send_frame(&mut write, &frame).await?;
    }

    while state.is_authenticated() {
        tokio::select! {
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<InboundFrame>(text.as_str()) {
                        Ok(frame) => {
                            if hub.route(frame).await != RouteResult::Delivered {
                                debug!("Frame from {} was not delivered", addr);
                            }
                        }
                        Err(e) => {
                            debug!("Invalid frame from {}: {}", addr, e);
                            send_frame(
                                &mut write,
                                &OutboundFrame::Error {
                                    message: format!("Invalid frame: {e}"),
                                },
                            )
                            .await?;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(Message::Binary(_))) => {
                    warn!("Bridge client {} sent a binary frame; ignoring", addr);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    return Err(BridgeError::Read {
                        message: format!("Error reading frame: {e}"),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            },
            changed = mounts.changed() => {
                if changed.is_err() {
                    info!("Mount feed closed, disconnecting {}", addr);
                    break;
                }
                let latest = mounts.borrow_and_update().clone();
                if let Some(frame) = latest {
                    send_frame(&mut write, &frame).await?;
                }
            }
            _ = shutdown.changed() => break,
        }
    }

    // The peer may already be gone.
    let _ = write.send(Message::Close(None)).await;
    info!("Bridge client {} disconnected", addr);
    Ok(())
}

async fn send_auth_failure(write: &mut WsSink, reason: &str) -> Result<(), BridgeError> {
    send_frame(
        write,
        &OutboundFrame::AuthResult {
            success: false,
            error: Some(reason.to_string()),
        },
    )
    .await
}

async fn send_frame(write: &mut WsSink, frame: &OutboundFrame) -> Result<(), BridgeError> {
    let text = serde_json::to_string(frame)?;
    write
        .send(Message::Text(text.into()))
        .await
        .map_err(|e| BridgeError::Send {
            message: format!("Failed to send frame: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
}
