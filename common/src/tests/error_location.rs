use crate::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures file, line, and column.
///
/// **WHY THIS MATTERS**: Every error variant in the host carries a location. If capture
/// breaks, diagnostics for dropped actions and config failures lose their source position.
///
/// **BUG THIS CATCHES**: Would catch if `Location::caller()` stops propagating or if the
/// file/line/column fields are swapped.
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN/WHEN: An ErrorLocation created at this exact spot
    let location = ErrorLocation::from(Location::caller());

    // THEN: File and column should be populated
    assert!(location.file.ends_with(".rs"), "Should capture a source file");
    assert!(location.line > 0, "Should capture a line number");
    assert!(location.column > 0, "Should capture column number");
}

#[track_caller]
fn located() -> ErrorLocation {
    ErrorLocation::caller()
}

/// **VALUE**: Verifies that `ErrorLocation::caller()` reports the caller of a
/// `#[track_caller]` function instead of the helper itself.
///
/// **BUG THIS CATCHES**: Would catch if `#[track_caller]` is dropped from `caller()`,
/// which would make every error point at `error_location.rs`.
#[test]
fn given_track_caller_helper_when_caller_used_then_points_at_call_site() {
    // GIVEN: The line of the call site
    let expected_line = line!() + 3;

    // WHEN: Capturing through a #[track_caller] helper
    let location = located();

    // THEN: Location is the call site in this file
    assert_eq!(location.line, expected_line);
    assert!(location.file.contains("error_location.rs"));
}

#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    let location = ErrorLocation {
        file: "src/bridge/hub.rs",
        line: 42,
        column: 7,
    };

    assert_eq!(location.to_string(), "[src/bridge/hub.rs:42:7]");
}
