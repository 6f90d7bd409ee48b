use crate::{Action, ActionKind, ActionPayload, ModelError};

use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn given_tool_action_when_serialized_then_only_tool_fields_present() {
    let action = Action::tool("increment", json!({}));

    let value = serde_json::to_value(&action).unwrap();

    assert_eq!(
        value,
        json!({ "kind": "tool", "payload": { "toolName": "increment", "params": {} } })
    );
}

#[test]
fn given_link_action_when_serialized_then_only_url_present() {
    let action: Action =
        serde_json::from_value(json!({ "kind": "link", "payload": { "url": "https://example.com/docs" } }))
            .unwrap();

    let value = serde_json::to_value(&action).unwrap();

    assert_eq!(
        value,
        json!({ "kind": "link", "payload": { "url": "https://example.com/docs" } })
    );
}

/// **VALUE**: Verifies that a tool action without params gets an empty object.
///
/// **WHY THIS MATTERS**: Surfaces frequently omit `params` for argument-less tools such as
/// `increment`. Rejecting them would make the counter buttons dead.
#[test]
fn given_tool_payload_without_params_when_from_parts_then_params_empty() {
    let payload = ActionPayload {
        tool_name: Some(String::from("increment")),
        ..ActionPayload::default()
    };

    let action = Action::from_parts(ActionKind::Tool, payload).unwrap();

    match action {
        Action::Tool { tool_name, params } => {
            assert_eq!(tool_name, "increment");
            assert!(params.is_empty());
        }
        other => panic!("Expected tool action, got {other:?}"),
    }
}

#[test]
fn given_array_params_when_from_parts_then_validation_error() {
    let payload = ActionPayload {
        tool_name: Some(String::from("addTodo")),
        params: Some(json!(["text"])),
        ..ActionPayload::default()
    };

    let result = Action::from_parts(ActionKind::Tool, payload);

    assert!(matches!(result, Err(ModelError::Validation { .. })));
}

#[test]
fn given_prompt_kind_without_prompt_when_from_parts_then_validation_error() {
    let payload = ActionPayload {
        tool_name: Some(String::from("increment")),
        ..ActionPayload::default()
    };

    assert!(Action::from_parts(ActionKind::Prompt, payload).is_err());
}

#[test]
fn given_unknown_kind_string_when_parsed_then_error() {
    assert!("navigate".parse::<ActionKind>().is_err());
    assert_eq!("prompt".parse::<ActionKind>().unwrap(), ActionKind::Prompt);
}
