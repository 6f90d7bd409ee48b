use crate::bridge_tests::helpers::{
    TEST_AUTH_TOKEN, authenticate, connect_to_server, is_connection_closed, receive_frame,
    receive_mount_at, send_inbound, send_json, start_test_host,
};

use host_core::bridge::{InboundFrame, OutboundFrame, encode_action};
use host_core::router::ViewKey;

use common::{Generation, SurfaceId};
use models::Action;

use serde_json::json;

/// **VALUE**: Verifies that a client with the right token is admitted and
/// immediately receives the current mount.
///
/// **WHY THIS MATTERS**: A client that connects after the session mounted must
/// still be able to render. Without the initial push it would show nothing
/// until the next state change.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - Valid tokens are rejected
/// - The auth-result frame is missing or malformed
/// - The current mount is not pushed on connect
#[tokio::test]
async fn given_valid_token_when_authenticating_then_receives_current_mount() {
    // GIVEN: A running host
    let (session, handle) = start_test_host().await;
    let mut ws = connect_to_server(&handle).await;

    // WHEN: Authenticating with the right token
    let (success, error) = authenticate(&mut ws, TEST_AUTH_TOKEN).await;

    // THEN: Auth succeeds and the hello view is pushed
    assert!(success, "Auth should succeed");
    assert_eq!(error, None);
    match receive_frame(&mut ws).await {
        OutboundFrame::Mount {
            surface,
            generation,
            resource,
            ..
        } => {
            assert_eq!(surface, SurfaceId::new("main"));
            assert_eq!(generation, Generation::new(1));
            assert!(resource.resource.uri.starts_with("ui://hello/greeting/"));
        }
        other => panic!("Expected mount frame, got {other:?}"),
    }

    handle.shutdown().await;
    session.shutdown().await.expect("session shuts down");
}

/// **VALUE**: Verifies that a wrong token is refused and the connection closed.
///
/// **WHY THIS MATTERS**: The bridge is the only way into host state. Any local
/// process can open a socket to it; only the holder of the token may drive it.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - Invalid tokens are accepted
/// - The connection stays open after a failed handshake
#[tokio::test]
async fn given_invalid_token_when_authenticating_then_rejected_and_closed() {
    // GIVEN: A running host
    let (session, handle) = start_test_host().await;
    let mut ws = connect_to_server(&handle).await;

    // WHEN: Authenticating with the wrong token
    let (success, error) = authenticate(&mut ws, "wrong-token").await;

    // THEN: Auth fails with a reason and the server hangs up
    assert!(!success, "Auth should fail");
    assert!(error.is_some_and(|reason| reason.contains("Invalid")));
    assert!(is_connection_closed(&mut ws).await, "Connection should close");

    handle.shutdown().await;
    session.shutdown().await.expect("session shuts down");
}

#[tokio::test]
async fn given_non_handshake_first_frame_when_sent_then_rejected() {
    let (session, handle) = start_test_host().await;
    let mut ws = connect_to_server(&handle).await;

    send_json(&mut ws, &json!({ "hello": "there" })).await;

    match receive_frame(&mut ws).await {
        OutboundFrame::AuthResult { success, error } => {
            assert!(!success);
            assert!(error.is_some_and(|reason| reason.contains("handshake")));
        }
        other => panic!("Expected auth-result, got {other:?}"),
    }
    assert!(is_connection_closed(&mut ws).await);

    handle.shutdown().await;
    session.shutdown().await.expect("session shuts down");
}

/// **VALUE**: Verifies the full loop: a surface action sent over the socket
/// changes host state and the client receives the regenerated view.
///
/// **WHY THIS MATTERS**: This is the end-to-end path every interactive view
/// depends on.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - Inbound frames are not routed to the session
/// - Remounts are not pushed to connected clients
/// - The generation in pushed frames does not advance
#[tokio::test]
async fn given_authenticated_client_when_action_sent_then_receives_remount() {
    // GIVEN: An authenticated client looking at the counter view
    let (session, handle) = start_test_host().await;
    let mut ws = connect_to_server(&handle).await;
    let (success, _) = authenticate(&mut ws, TEST_AUTH_TOKEN).await;
    assert!(success);
    receive_mount_at(&mut ws, Generation::new(1)).await;

    session
        .navigate(ViewKey::Counter)
        .await
        .expect("navigates");
    let counter_mount = receive_mount_at(&mut ws, Generation::new(2)).await;
    let OutboundFrame::Mount {
        surface,
        generation,
        ..
    } = counter_mount
    else {
        panic!("Expected mount frame");
    };

    // WHEN: The surface posts an increment
    send_inbound(
        &mut ws,
        &InboundFrame {
            surface,
            generation,
            message: encode_action(&Action::tool("increment", json!({}))),
        },
    )
    .await;

    // THEN: A new mount with the incremented value arrives
    match receive_mount_at(&mut ws, generation.next()).await {
        OutboundFrame::Mount { resource, .. } => {
            assert!(
                resource
                    .resource
                    .text
                    .as_deref()
                    .is_some_and(|html| html.contains(">1</div>")),
                "Remounted counter should show 1"
            );
        }
        other => panic!("Expected mount frame, got {other:?}"),
    }
    session.barrier().await.expect("barrier");
    assert_eq!(session.snapshot().await.state.counter.value, 1);

    handle.shutdown().await;
    session.shutdown().await.expect("session shuts down");
}

#[tokio::test]
async fn given_authenticated_client_when_garbage_frame_sent_then_receives_error() {
    let (session, handle) = start_test_host().await;
    let mut ws = connect_to_server(&handle).await;
    authenticate(&mut ws, TEST_AUTH_TOKEN).await;
    receive_mount_at(&mut ws, Generation::new(1)).await;

    send_json(&mut ws, &json!({ "surface": "main" })).await;

    match receive_frame(&mut ws).await {
        OutboundFrame::Error { message } => assert!(message.starts_with("Invalid frame")),
        other => panic!("Expected error frame, got {other:?}"),
    }

    handle.shutdown().await;
    session.shutdown().await.expect("session shuts down");
}

#[tokio::test]
async fn given_open_connection_when_server_shuts_down_then_connection_closes() {
    let (session, handle) = start_test_host().await;
    let mut ws = connect_to_server(&handle).await;
    authenticate(&mut ws, TEST_AUTH_TOKEN).await;
    receive_mount_at(&mut ws, Generation::new(1)).await;

    handle.shutdown().await;

    assert!(is_connection_closed(&mut ws).await);
    session.shutdown().await.expect("session shuts down");
}
