//! Decoding of messages posted by a surface.
//!
//! The channel is shared with unrelated traffic, so anything that is not a
//! recognised envelope is classified rather than rejected.

use crate::generator::markup::ACTION_ENVELOPE_TYPE;
use crate::renderer::SurfaceSize;
use crate::renderer::document::SIZE_CHANGE_TYPE;

use models::{Action, ActionKind, ActionPayload};

use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeMessage {
    Action(Action),
    SizeChange(SurfaceSize),
    /// Some other `type`, or no `type` at all.
    Ignored { message_type: Option<String> },
    /// A recognised `type` whose body is unusable.
    Malformed { reason: String },
}

#[derive(Deserialize)]
struct MeasuredSize {
    width: f64,
    height: f64,
}

/// Classifies one inbound message.
pub fn decode(message: &Value) -> BridgeMessage {
    let message_type = message.get("type").and_then(Value::as_str);

    match message_type {
        Some(ACTION_ENVELOPE_TYPE) => decode_action(message),
        Some(SIZE_CHANGE_TYPE) => decode_size(message),
        other => BridgeMessage::Ignored {
            message_type: other.map(str::to_string),
        },
    }
}

fn decode_action(message: &Value) -> BridgeMessage {
    let Some(raw_kind) = message.get("kind").and_then(Value::as_str) else {
        return BridgeMessage::Malformed {
            reason: String::from("resource-action without kind"),
        };
    };
    let kind = match raw_kind.parse::<ActionKind>() {
        Ok(kind) => kind,
        Err(e) => {
            return BridgeMessage::Malformed {
                reason: e.to_string(),
            };
        }
    };

    let payload = match message.get("payload") {
        None | Some(Value::Null) => ActionPayload::default(),
        Some(raw) => match ActionPayload::deserialize(raw) {
            Ok(payload) => payload,
            Err(e) => {
                return BridgeMessage::Malformed {
                    reason: format!("invalid payload: {e}"),
                };
            }
        },
    };

    match Action::from_parts(kind, payload) {
        Ok(action) => BridgeMessage::Action(action),
        Err(e) => BridgeMessage::Malformed {
            reason: e.to_string(),
        },
    }
}

fn decode_size(message: &Value) -> BridgeMessage {
    let measured = message
        .get("payload")
        .ok_or_else(|| String::from("size change without payload"))
        .and_then(|raw| MeasuredSize::deserialize(raw).map_err(|e| e.to_string()));

    match measured {
        Ok(MeasuredSize { width, height })
            if width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0 =>
        {
            BridgeMessage::SizeChange(SurfaceSize {
                width: width.round() as u32,
                height: height.round() as u32,
            })
        }
        Ok(_) => BridgeMessage::Malformed {
            reason: String::from("size change with negative or non-finite dimensions"),
        },
        Err(reason) => BridgeMessage::Malformed { reason },
    }
}

/// The envelope a surface posts for `action`.
pub fn encode_action(action: &Action) -> Value {
    json!({
        "type": ACTION_ENVELOPE_TYPE,
        "kind": action.kind(),
        "payload": action.payload(),
    })
}
