use crate::{ContentKind, FrameworkTag, ModelError, ResourceBuilder};

use url::Url;

/// **VALUE**: Verifies that the builder rejects a resource with no content.
///
/// **WHY THIS MATTERS**: A resource without payload cannot be mounted; the renderer
/// would have nothing to isolate and the producer would be left without a display.
///
/// **BUG THIS CATCHES**: Would catch if the "exactly one content" check is removed.
#[test]
fn given_no_content_when_building_resource_then_returns_validation_error() {
    // GIVEN: Builder with only a uri
    let builder = ResourceBuilder::new("ui://counter/interactive");

    // WHEN: Attempting to build
    let result = builder.build();

    // THEN: Should return validation error
    match result.unwrap_err() {
        ModelError::Validation { message, .. } => assert_eq!(message, "Content is required"),
        other => panic!("Expected validation error, got {other:?}"),
    }
}

/// **VALUE**: Verifies that two payloads cannot be combined in one resource.
///
/// **BUG THIS CATCHES**: Would catch if the builder silently kept the last payload,
/// which would let markup and an embedded URL disagree about the content kind.
#[test]
fn given_two_payloads_when_building_then_returns_validation_error() {
    let builder = ResourceBuilder::new("ui://dashboard/external")
        .html("<p>hi</p>")
        .external_url(Url::parse("https://example.com").unwrap());

    match builder.build().unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert_eq!(message, "Exactly one content payload is allowed")
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[test]
fn given_non_ui_scheme_when_building_then_returns_validation_error() {
    let result = ResourceBuilder::new("https://example.com/page")
        .html("<p>hi</p>")
        .build();

    assert!(matches!(result, Err(ModelError::Validation { .. })));
}

#[test]
fn given_bare_scheme_when_building_then_returns_validation_error() {
    let result = ResourceBuilder::new("ui://").html("<p>hi</p>").build();

    assert!(matches!(result, Err(ModelError::Validation { .. })));
}

#[test]
fn given_blank_markup_when_building_then_returns_validation_error() {
    let result = ResourceBuilder::new("ui://hello/greeting")
        .html("   \n ")
        .build();

    assert!(matches!(result, Err(ModelError::Validation { .. })));
}

#[test]
fn given_remote_program_when_building_then_kind_and_framework_match() {
    let resource = ResourceBuilder::new("ui://summary/remote")
        .remote_program("root.appendChild(x)", FrameworkTag::react())
        .with_title("Summary")
        .build()
        .expect("valid remote program");

    assert_eq!(resource.content_kind(), ContentKind::RemoteProgram);
    assert_eq!(resource.title(), Some("Summary"));
    assert!(resource.html().is_none());
}

#[test]
fn given_no_title_or_description_when_building_then_metadata_is_absent() {
    let resource = ResourceBuilder::new("ui://hello/greeting")
        .html("<p>hi</p>")
        .build()
        .expect("valid resource");

    assert!(resource.metadata().is_none());
}
