use crate::config::{HostConfig, StaleActionPolicy};
use crate::error::config::ConfigError;
use crate::renderer::Capability;
use crate::router::state::ViewKey;

use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn given_missing_file_when_load_called_then_returns_defaults() {
    let dir = TempDir::new().unwrap();

    let config = HostConfig::load(dir.path()).expect("defaults");

    assert_eq!(config, HostConfig::default());
    assert_eq!(config.bridge.port, 19877);
    assert_eq!(config.initial_view(), ViewKey::Hello);
    assert_eq!(config.session.stale_action_policy, StaleActionPolicy::Discard);
    assert_eq!(config.toast_ttl(), Duration::from_millis(3000));
    assert_eq!(config.refresh_latency(), Duration::from_millis(800));
}

/// **VALUE**: Saved config loads back unchanged.
///
/// **WHY THIS MATTERS**: The playground writes a default config on first run
/// and reads it on every start after that.
///
/// **BUG THIS CATCHES**: Serde renames that serialize one way and parse
/// another, or a temp file left behind instead of renamed.
#[test]
fn given_custom_config_when_saved_and_loaded_then_equal() {
    // GIVEN: A config with every section changed
    let dir = TempDir::new().unwrap();
    let mut config = HostConfig::default();
    config.bridge.port = 20001;
    config.bridge.auth_token = Some(String::from("fixed-token"));
    config.session.initial_view = String::from("weather");
    config.session.action_log_capacity = 20;
    config.session.stale_action_policy = StaleActionPolicy::Accept;
    config.toasts.ttl_ms = 1500;
    config.effects.refresh_latency_ms = 50;
    config.surface.min_height = 200;
    config.sandbox.capabilities = vec![Capability::Scripts, Capability::Modals];

    // WHEN: Saving and loading
    config.save(dir.path()).expect("saves");
    let loaded = HostConfig::load(dir.path()).expect("loads");

    // THEN: Nothing was lost and no temp file remains
    assert_eq!(loaded, config);
    assert!(dir.path().join("host.toml").exists());
    assert!(!dir.path().join("host.toml.tmp").exists());
}

#[test]
fn given_partial_file_when_loaded_then_missing_fields_default() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("host.toml"),
        "[bridge]\nport = 21000\n\n[session]\nstale_action_policy = \"accept\"\n",
    )
    .unwrap();

    let config = HostConfig::load(dir.path()).expect("loads");

    assert_eq!(config.bridge.port, 21000);
    assert_eq!(config.bridge.auth_token, None);
    assert_eq!(config.session.stale_action_policy, StaleActionPolicy::Accept);
    assert_eq!(config.session.action_log_capacity, 50);
    assert_eq!(config.toasts, HostConfig::default().toasts);
}

#[test]
fn given_invalid_toml_when_loaded_then_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("host.toml"), "[bridge\nport = ").unwrap();

    let result = HostConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn given_invalid_values_when_validated_then_each_is_rejected() {
    let mut cases: Vec<(&str, HostConfig)> = Vec::new();

    let mut config = HostConfig::default();
    config.version = 2;
    cases.push(("version", config));

    let mut config = HostConfig::default();
    config.bridge.port = 0;
    cases.push(("port", config));

    let mut config = HostConfig::default();
    config.bridge.auth_token = Some(String::from("  "));
    cases.push(("auth_token", config));

    let mut config = HostConfig::default();
    config.session.initial_view = String::from("spaceship");
    cases.push(("initial_view", config));

    let mut config = HostConfig::default();
    config.session.action_log_capacity = 0;
    cases.push(("action_log_capacity", config));

    let mut config = HostConfig::default();
    config.toasts.ttl_ms = 0;
    cases.push(("ttl_ms", config));

    let mut config = HostConfig::default();
    config.sandbox.capabilities = vec![Capability::Scripts, Capability::SameOrigin];
    cases.push(("same-origin", config));

    for (field, config) in cases {
        match config.validate() {
            Err(ConfigError::ValidationError { reason, .. }) => {
                assert!(reason.contains(field), "{reason} should mention {field}");
            }
            other => panic!("{field}: expected validation error, got {other:?}"),
        }
    }
}

#[test]
fn given_invalid_config_when_saved_then_nothing_is_written() {
    let dir = TempDir::new().unwrap();
    let mut config = HostConfig::default();
    config.bridge.port = 0;

    assert!(config.save(dir.path()).is_err());
    assert!(!dir.path().join("host.toml").exists());
}

#[test]
fn given_disallowed_capabilities_when_renderer_settings_built_then_dropped() {
    // Popups alone passes validation but never reaches a surface
    let mut config = HostConfig::default();
    config.sandbox.capabilities = vec![Capability::Scripts, Capability::Popups];
    config.surface.padding = 8;
    config.validate().expect("valid");

    let settings = config.renderer_settings();

    assert_eq!(settings.sandbox.attribute(), "allow-scripts");
    assert_eq!(settings.padding, 8);
    assert_eq!(settings.min_height, 300);
}
