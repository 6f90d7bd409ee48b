use crate::wire::{MIME_HTML, MIME_URI_LIST, remote_program_mime};
use crate::{Encoding, FrameworkTag, ModelError, Resource, ResourceBuilder, ResourceContent};

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;

fn sample_resources() -> Vec<Resource> {
    vec![
        ResourceBuilder::new("ui://counter/interactive")
            .html("<div>3</div>")
            .with_title("Counter")
            .with_description("Current value: 3")
            .build()
            .unwrap(),
        ResourceBuilder::new("ui://dashboard/external")
            .external_url(Url::parse("https://modelcontextprotocol.io").unwrap())
            .with_title("External Dashboard")
            .build()
            .unwrap(),
        ResourceBuilder::new("ui://summary/remote")
            .remote_program("const el = document.createElement('ui-text');", FrameworkTag::react())
            .build()
            .unwrap(),
        ResourceBuilder::new("ui://hello/greeting")
            .html("<h1>Hello, Ünïcode ✓</h1>")
            .with_encoding(Encoding::Blob)
            .build()
            .unwrap(),
    ]
}

/// **VALUE**: Verifies that every content kind survives serialize → parse unchanged.
///
/// **WHY THIS MATTERS**: Resources cross the bridge as JSON. A lossy round trip would make
/// the host render something other than what the producer generated.
///
/// **BUG THIS CATCHES**: Would catch mime/framework mapping drift, base64 blob corruption
/// of non-ASCII markup, or metadata getting dropped.
#[test]
fn given_resources_of_every_kind_when_round_tripped_through_json_then_equal() {
    for resource in sample_resources() {
        // WHEN: Serializing to the wire format and parsing back
        let json = serde_json::to_string(&resource).expect("serialize");
        let parsed: Resource = serde_json::from_str(&json).expect("parse");

        // THEN: Values are equal
        assert_eq!(parsed, resource);
    }
}

#[test]
fn given_inline_markup_when_serialized_then_matches_wire_shape() {
    let resource = &sample_resources()[0];

    let value = serde_json::to_value(resource).unwrap();

    assert_eq!(
        value,
        json!({
            "type": "resource",
            "resource": {
                "uri": "ui://counter/interactive",
                "mimeType": MIME_HTML,
                "text": "<div>3</div>",
                "meta": { "title": "Counter", "description": "Current value: 3" }
            }
        })
    );
}

#[test]
fn given_blob_encoding_when_serialized_then_text_is_absent() {
    let resource = &sample_resources()[3];

    let wire = resource.to_wire();

    assert!(wire.resource.text.is_none());
    assert!(wire.resource.blob.is_some());
}

#[test]
fn given_legacy_meta_key_when_parsed_then_metadata_is_kept() {
    let value = json!({
        "type": "resource",
        "resource": {
            "uri": "ui://weather/current",
            "mimeType": "text/html",
            "text": "<div/>",
            "_meta": { "title": "Weather" }
        }
    });

    let resource: Resource = serde_json::from_value(value).unwrap();

    assert_eq!(resource.title(), Some("Weather"));
}

#[test]
fn given_uri_list_with_comments_when_parsed_then_first_uri_is_used() {
    let value = json!({
        "type": "resource",
        "resource": {
            "uri": "ui://dashboard/docs",
            "mimeType": MIME_URI_LIST,
            "text": "# primary\nhttps://example.com/a\nhttps://example.com/b"
        }
    });

    let resource: Resource = serde_json::from_value(value).unwrap();

    assert_eq!(
        resource.content(),
        &ResourceContent::ExternalReference {
            url: Url::parse("https://example.com/a").unwrap()
        }
    );
}

#[test]
fn given_unknown_framework_tag_when_parsed_then_tag_is_preserved() {
    let value = json!({
        "type": "resource",
        "resource": {
            "uri": "ui://widget/x",
            "mimeType": remote_program_mime(&FrameworkTag::new("svelte")),
            "text": "mount()"
        }
    });

    let resource: Resource = serde_json::from_value(value).unwrap();

    match resource.content() {
        ResourceContent::RemoteProgram { framework, .. } => assert_eq!(framework.as_str(), "svelte"),
        other => panic!("Expected remote program, got {other:?}"),
    }
}

/// **VALUE**: Verifies that framework tags containing MIME separators round-trip intact.
///
/// **WHY THIS MATTERS**: The tag travels as a mimeType parameter. An unquoted `;` or `=`
/// splits it into extra parameters, so the parsed resource targets a different framework.
///
/// **BUG THIS CATCHES**: Would catch `react;v=18` coming back as `react`, which the renderer
/// would then happily mount with the wrong adapter.
#[test]
fn given_framework_tag_with_separators_when_round_tripped_then_tag_is_unchanged() {
    for tag in ["react;v=18", "my \"quoted\" tag", "a\\b"] {
        let resource = ResourceBuilder::new("ui://summary/remote")
            .remote_program("mount()", FrameworkTag::new(tag))
            .build()
            .unwrap();

        let json = serde_json::to_value(&resource).unwrap();
        let parsed: Resource = serde_json::from_value(json).unwrap();

        assert_eq!(parsed, resource, "tag {tag:?} did not survive");
    }
}

#[test]
fn given_token_framework_tag_when_serialized_then_parameter_is_unquoted() {
    assert_eq!(
        remote_program_mime(&FrameworkTag::react()),
        "application/vnd.mcp-ui.remote-dom+javascript; framework=react"
    );
    assert_eq!(
        remote_program_mime(&FrameworkTag::new("react;v=18")),
        "application/vnd.mcp-ui.remote-dom+javascript; framework=\"react;v=18\""
    );
}

#[test]
fn given_extra_mime_parameters_when_parsed_then_framework_is_found() {
    let value = json!({
        "type": "resource",
        "resource": {
            "uri": "ui://widget/x",
            "mimeType": "application/vnd.mcp-ui.remote-dom+javascript; charset=utf-8; framework=\"webcomponents\"",
            "text": "mount()"
        }
    });

    let resource: Resource = serde_json::from_value(value).unwrap();

    match resource.content() {
        ResourceContent::RemoteProgram { framework, .. } => {
            assert_eq!(framework.as_str(), "webcomponents")
        }
        other => panic!("Expected remote program, got {other:?}"),
    }
}

#[test]
fn given_both_text_and_blob_when_parsed_then_returns_wire_error() {
    let wire = serde_json::from_value(json!({
        "type": "resource",
        "resource": { "uri": "ui://a/b", "mimeType": "text/html", "text": "x", "blob": "eA==" }
    }))
    .unwrap();

    assert!(matches!(Resource::from_wire(wire), Err(ModelError::Wire { .. })));
}

#[test]
fn given_unsupported_mime_when_parsed_then_returns_wire_error() {
    let result: Result<Resource, _> = serde_json::from_value(json!({
        "type": "resource",
        "resource": { "uri": "ui://a/b", "mimeType": "image/png", "text": "x" }
    }));

    assert!(result.is_err());
}
