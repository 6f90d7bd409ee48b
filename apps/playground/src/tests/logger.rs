// Only one test installs the logger: the global logger can be set once per process

use crate::logger::{initialize, resolve_level, short_target};

use log::LevelFilter;
use tempfile::TempDir;

/// **VALUE**: Verifies that calling initialize() twice doesn't panic or fail.
///
/// **WHY THIS MATTERS**: main() and tests may both reach initialization. If the
/// second call errors, startup fails on a harmless repeat.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed,
/// causing fern to fail when setting a global logger twice.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A writable log directory
    let temp_dir = TempDir::new().unwrap();

    // WHEN: Calling initialize twice
    let result1 = initialize(temp_dir.path());
    let result2 = initialize(temp_dir.path());

    // THEN: Both should return Ok
    assert!(result1.is_ok(), "First initialization should succeed");
    assert!(result2.is_ok(), "Second initialization should be a no-op");

    // AND: The log file was created
    assert!(temp_dir.path().join("playground.log").exists());
}

/// **VALUE**: `UI_HOST_LOG` picks the level; junk falls back to the default.
///
/// **BUG THIS CATCHES**: A typo in `.env` silencing all logging, or the
/// override being ignored.
#[test]
fn given_level_override_when_resolved_then_named_level_or_default() {
    assert_eq!(resolve_level(Some("trace")), LevelFilter::Trace);
    assert_eq!(resolve_level(Some(" WARN ")), LevelFilter::Warn);
    assert_eq!(resolve_level(Some("off")), LevelFilter::Off);

    let default = resolve_level(None);
    assert_eq!(resolve_level(Some("")), default);
    assert_eq!(resolve_level(Some("loud")), default);
}

#[test]
fn given_module_path_target_when_shortened_then_last_segment_kept() {
    assert_eq!(short_target("host_core::session::actor"), "actor");
    assert_eq!(short_target("playground"), "playground");
}
