use host_core::bridge::BridgeHub;
use host_core::{Collaborators, HostConfig, HostSession, SessionOptions, StaleActionPolicy, ViewKey};

use common::Generation;

use tempfile::TempDir;

/// **VALUE**: A config file on disk drives the session that is started from it.
///
/// **WHY THIS MATTERS**: The playground binary does exactly this on every
/// start; a setting that parses but never reaches the session is a silent bug.
///
/// **BUG THIS CATCHES**: `SessionOptions::from_config` ignoring a section.
#[tokio::test]
async fn given_config_file_when_session_started_from_it_then_settings_apply() {
    // GIVEN: A config that starts on the todo view with a tiny log
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("host.toml"),
        "[session]\ninitial_view = \"todo\"\naction_log_capacity = 2\nstale_action_policy = \"accept\"\n",
    )
    .expect("writes config");
    let config = HostConfig::load(dir.path()).expect("loads");
    assert_eq!(config.session.stale_action_policy, StaleActionPolicy::Accept);

    // WHEN: Starting a session from it and sending three actions
    let session = HostSession::start(
        SessionOptions::from_config(&config),
        BridgeHub::new(),
        Collaborators::logging(),
    )
    .await
    .expect("session starts");
    for id in [1, 2, 1] {
        session
            .dispatch(
                models::Action::tool("toggleTodo", serde_json::json!({ "id": id })),
                Generation::UNMOUNTED,
            )
            .await
            .expect("dispatches");
    }
    session.barrier().await.expect("barrier");

    // THEN: The todo view is active and the log kept only two entries
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.active_view, ViewKey::Todo);
    assert_eq!(snapshot.action_log.len(), 2);
    assert_eq!(snapshot.action_log[0].sequence_id, 3);
    assert!(
        snapshot.state.todo.items.iter().all(|item| item.completed),
        "item 1 toggled twice, item 2 once"
    );

    session.shutdown().await.expect("shuts down");
}
