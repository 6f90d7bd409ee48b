use playground::app::RunningHost;
use playground::connection::BridgeConnection;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::time::{Duration, timeout};
use tokio_tungstenite::{connect_async, tungstenite::Message};

const TEST_PORT: u16 = 19893;
const TEST_TOKEN: &str = "playground-test-token";

async fn next_json<S>(ws: &mut S) -> Value
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let msg = timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("Timed out waiting for frame")
            .expect("Stream ended")
            .expect("Error receiving message");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("Frame is JSON");
        }
    }
}

/// **VALUE**: The host started from a config dir is reachable through the
/// connection file it writes, and serves the configured initial view.
///
/// **WHY THIS MATTERS**: This is the whole startup path of the binary minus
/// the Ctrl+C wait; clients know nothing but `bridge.json`.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - `host.toml` settings don't reach the session or bridge
/// - `bridge.json` is written with the wrong port or token
/// - Shutdown leaves the connection file behind
#[tokio::test]
async fn given_config_dir_when_host_started_then_client_connects_via_connection_file() {
    // GIVEN: A config dir with a fixed port, token and initial view
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("host.toml"),
        format!(
            "[bridge]\nport = {TEST_PORT}\nauth_token = \"{TEST_TOKEN}\"\n\n[session]\ninitial_view = \"counter\"\n"
        ),
    )
    .unwrap();

    // WHEN: Starting the host
    let host = RunningHost::start(dir.path()).await.expect("host starts");

    // THEN: bridge.json carries what a client needs
    let connection = BridgeConnection::read(dir.path()).expect("connection file");
    assert_eq!(connection.port(), TEST_PORT);
    assert_eq!(connection.auth_token(), TEST_TOKEN);
    assert_eq!(&connection, host.connection());

    // AND: A client using it is admitted and sees the counter view
    let (mut ws, _) = connect_async(connection.url()).await.expect("connects");
    ws.send(Message::Text(
        json!({ "token": connection.auth_token() }).to_string().into(),
    ))
    .await
    .unwrap();
    let auth = next_json(&mut ws).await;
    assert_eq!(auth["type"], "auth-result");
    assert_eq!(auth["success"], true);
    let mount = next_json(&mut ws).await;
    assert_eq!(mount["type"], "mount");
    assert!(
        mount["resource"]["resource"]["uri"]
            .as_str()
            .is_some_and(|uri| uri.starts_with("ui://counter/interactive/"))
    );

    // AND: Shutdown removes the connection file
    host.shutdown().await.expect("host stops");
    assert!(!BridgeConnection::path(dir.path()).exists());
}

/// **VALUE**: First run leaves an editable `host.toml` behind.
///
/// **BUG THIS CATCHES**: Would catch if defaults are only used in memory.
#[tokio::test]
async fn given_missing_config_when_host_started_then_defaults_are_saved() {
    // GIVEN: An empty config dir
    let dir = TempDir::new().unwrap();

    // WHEN: Starting the host (the default port may be taken on this machine)
    let started = RunningHost::start(dir.path()).await;

    // THEN: host.toml exists either way; it is written before binding
    let saved = std::fs::read_to_string(dir.path().join("host.toml")).unwrap();
    assert!(saved.contains("[bridge]"));
    if let Ok(host) = started {
        host.shutdown().await.expect("host stops");
    }
}
