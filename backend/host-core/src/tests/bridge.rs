use crate::bridge::connection_state::ConnectionState;
use crate::bridge::{
    BridgeHub, BridgeMessage, InboundFrame, OutboundFrame, RouteResult, decode, encode_action,
};
use crate::renderer::SurfaceSize;

use common::{Generation, SurfaceId};
use models::Action;

use std::net::SocketAddr;

use pretty_assertions::assert_eq;
use serde_json::{Map, json};
use tokio::sync::mpsc;
use url::Url;

// ============================================
// ENVELOPE DECODING
// ============================================

#[test]
fn given_tool_envelope_when_decoded_then_yields_tool_action() {
    let message = json!({
        "type": "resource-action",
        "kind": "tool",
        "payload": { "toolName": "addTodo", "params": { "text": "Milk" } }
    });

    let decoded = decode(&message);

    assert_eq!(
        decoded,
        BridgeMessage::Action(Action::tool("addTodo", json!({ "text": "Milk" })))
    );
}

#[test]
fn given_tool_envelope_without_params_when_decoded_then_params_are_empty() {
    let message = json!({
        "type": "resource-action",
        "kind": "tool",
        "payload": { "toolName": "increment" }
    });

    match decode(&message) {
        BridgeMessage::Action(Action::Tool { tool_name, params }) => {
            assert_eq!(tool_name, "increment");
            assert_eq!(params, Map::new());
        }
        other => panic!("Expected tool action, got {other:?}"),
    }
}

/// **VALUE**: Broken envelopes are classified, never thrown.
///
/// **WHY THIS MATTERS**: Surfaces run untrusted code. A single bad message
/// must not take down the session actor or the connection.
///
/// **BUG THIS CATCHES**: A decoder that panics, or one that turns a bad
/// envelope into a default action.
#[test]
fn given_invalid_action_envelopes_when_decoded_then_malformed() {
    let cases = [
        json!({ "type": "resource-action" }),
        json!({ "type": "resource-action", "kind": "teleport", "payload": {} }),
        json!({ "type": "resource-action", "kind": "tool", "payload": {} }),
        json!({ "type": "resource-action", "kind": "tool", "payload": { "toolName": "x", "params": [1] } }),
        json!({ "type": "resource-action", "kind": "link", "payload": { "url": "not a url" } }),
        json!({ "type": "resource-action", "kind": "prompt", "payload": 42 }),
    ];

    for message in cases {
        assert!(
            matches!(decode(&message), BridgeMessage::Malformed { .. }),
            "{message} should be malformed"
        );
    }
}

#[test]
fn given_foreign_messages_when_decoded_then_ignored_with_type() {
    assert_eq!(
        decode(&json!({ "type": "devtools-ping" })),
        BridgeMessage::Ignored {
            message_type: Some(String::from("devtools-ping"))
        }
    );
    assert_eq!(
        decode(&json!({ "hello": "world" })),
        BridgeMessage::Ignored { message_type: None }
    );
    assert_eq!(
        decode(&json!("plain string")),
        BridgeMessage::Ignored { message_type: None }
    );
}

#[test]
fn given_size_change_when_decoded_then_dimensions_are_rounded() {
    let message = json!({ "type": "ui-size-change", "payload": { "width": 319.6, "height": 480.2 } });

    assert_eq!(
        decode(&message),
        BridgeMessage::SizeChange(SurfaceSize {
            width: 320,
            height: 480
        })
    );
}

#[test]
fn given_negative_size_when_decoded_then_malformed() {
    let message = json!({ "type": "ui-size-change", "payload": { "width": 10, "height": -1 } });

    assert!(matches!(decode(&message), BridgeMessage::Malformed { .. }));
    assert!(matches!(
        decode(&json!({ "type": "ui-size-change" })),
        BridgeMessage::Malformed { .. }
    ));
}

#[test]
fn given_link_action_when_encoded_then_decodes_to_same_action() {
    let action = Action::Link {
        url: Url::parse("https://example.com/a?b=c").unwrap(),
    };

    let envelope = encode_action(&action);

    assert_eq!(envelope["type"], "resource-action");
    assert_eq!(envelope["kind"], "link");
    assert_eq!(decode(&envelope), BridgeMessage::Action(action));
}

// ============================================
// FRAMES
// ============================================

#[test]
fn given_outbound_frames_when_serialized_then_tagged_kebab_case() {
    let auth = serde_json::to_value(OutboundFrame::AuthResult {
        success: true,
        error: None,
    })
    .unwrap();
    assert_eq!(auth, json!({ "type": "auth-result", "success": true }));

    let unrenderable = serde_json::to_value(OutboundFrame::Unrenderable {
        surface: SurfaceId::new("main"),
        generation: Generation::new(3),
        reason: String::from("no adapter"),
    })
    .unwrap();
    assert_eq!(
        unrenderable,
        json!({ "type": "unrenderable", "surface": "main", "generation": 3, "reason": "no adapter" })
    );
}

#[test]
fn given_inbound_frame_json_when_parsed_then_fields_are_typed() {
    let frame: InboundFrame = serde_json::from_value(json!({
        "surface": "main",
        "generation": 2,
        "message": { "type": "x" }
    }))
    .unwrap();

    assert_eq!(frame.surface, SurfaceId::new("main"));
    assert_eq!(frame.generation, Generation::new(2));
}

// ============================================
// HUB
// ============================================

fn frame(surface: &str, generation: u64) -> InboundFrame {
    InboundFrame {
        surface: SurfaceId::new(surface),
        generation: Generation::new(generation),
        message: json!({ "type": "ping" }),
    }
}

#[tokio::test]
async fn given_no_subscription_when_routed_then_no_route() {
    let hub = BridgeHub::new();

    assert_eq!(hub.route(frame("main", 1)).await, RouteResult::NoRoute);
}

#[tokio::test]
async fn given_subscription_when_routed_then_delivered_in_order() {
    // GIVEN: A route for the main surface
    let hub = BridgeHub::new();
    let (tx, mut rx) = mpsc::channel(4);
    let _subscription = hub.subscribe(SurfaceId::new("main"), Generation::new(1), tx);

    // WHEN: Routing two frames
    assert_eq!(hub.route(frame("main", 1)).await, RouteResult::Delivered);
    assert_eq!(hub.route(frame("main", 2)).await, RouteResult::Delivered);

    // THEN: Both arrive in order; other surfaces are unrouted
    assert_eq!(rx.recv().await.map(|f| f.generation), Some(Generation::new(1)));
    assert_eq!(rx.recv().await.map(|f| f.generation), Some(Generation::new(2)));
    assert_eq!(hub.route(frame("side", 1)).await, RouteResult::NoRoute);
}

/// **VALUE**: Dropping an old mount's subscription leaves the new route alone.
///
/// **WHY THIS MATTERS**: On remount the new subscription is installed before
/// the old one is dropped. If the old drop removed the route, every remount
/// would silently disconnect the surface.
///
/// **BUG THIS CATCHES**: `Drop` removing by surface id without checking the
/// generation it owns.
#[tokio::test]
async fn given_resubscribed_surface_when_old_subscription_dropped_then_route_survives() {
    // GIVEN: Generation 1 replaced by generation 2
    let hub = BridgeHub::new();
    let surface = SurfaceId::new("main");
    let (tx, mut rx) = mpsc::channel(4);
    let old = hub.subscribe(surface.clone(), Generation::new(1), tx.clone());
    let current = hub.subscribe(surface.clone(), Generation::new(2), tx);

    // WHEN: The old subscription is dropped
    drop(old);

    // THEN: The route still points at generation 2
    assert_eq!(hub.routed_generation(&surface), Some(Generation::new(2)));
    assert_eq!(hub.route(frame("main", 2)).await, RouteResult::Delivered);
    assert!(rx.recv().await.is_some());

    // WHEN: The current one is dropped too
    drop(current);

    // THEN: The surface is unrouted
    assert_eq!(hub.routed_generation(&surface), None);
    assert_eq!(hub.route(frame("main", 2)).await, RouteResult::NoRoute);
}

#[tokio::test]
async fn given_receiver_dropped_when_routed_then_closed() {
    let hub = BridgeHub::new();
    let (tx, rx) = mpsc::channel(1);
    let _subscription = hub.subscribe(SurfaceId::new("main"), Generation::new(1), tx);
    drop(rx);

    assert_eq!(hub.route(frame("main", 1)).await, RouteResult::Closed);
}

// ============================================
// CONNECTION STATE
// ============================================

fn peer() -> SocketAddr {
    "127.0.0.1:50000".parse().unwrap()
}

#[test]
fn given_matching_token_when_validated_then_authenticated() {
    let mut state = ConnectionState::new(peer(), String::from("secret-token"));
    assert!(!state.is_authenticated());

    assert!(state.validate_token("secret-token"));
    assert!(state.is_authenticated());
    assert_eq!(state.peer(), peer());
}

#[test]
fn given_wrong_or_prefix_token_when_validated_then_not_authenticated() {
    let mut state = ConnectionState::new(peer(), String::from("secret-token"));

    assert!(!state.validate_token("secret-tokeN"));
    assert!(!state.validate_token("secret"));
    assert!(!state.validate_token(""));
    assert!(!state.is_authenticated());
}
