use crate::effects::DEFAULT_REFRESH_LATENCY;
use crate::error::config::ConfigError;
use crate::renderer::{
    Capability, DEFAULT_HEIGHT_PADDING, DEFAULT_MIN_HEIGHT, RendererSettings, SandboxPolicy,
};
use crate::router::action_log::DEFAULT_ACTION_LOG_CAPACITY;
use crate::router::state::ViewKey;
use crate::router::toast::DEFAULT_TOAST_TTL;

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "host.toml";
const CONFIG_VERSION: u32 = 1;
const DEFAULT_BRIDGE_PORT: u16 = 19877;

// ============================================
// ENUMS WITH DEFAULTS
// ============================================

/// What to do with an action tagged with an older mount generation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StaleActionPolicy {
    /// Drop it before it is logged.
    #[default]
    Discard,
    /// Process it against the current state.
    Accept,
}

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    #[serde(default = "default_bridge_port")]
    pub port: u16,
    /// Fixed token; a random one is generated per start when absent.
    pub auth_token: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            port: default_bridge_port(),
            auth_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    #[serde(default = "default_initial_view")]
    pub initial_view: String,
    #[serde(default = "default_action_log_capacity")]
    pub action_log_capacity: usize,
    #[serde(default)]
    pub stale_action_policy: StaleActionPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_view: default_initial_view(),
            action_log_capacity: default_action_log_capacity(),
            stale_action_policy: StaleActionPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToastConfig {
    #[serde(default = "default_toast_ttl_ms")]
    pub ttl_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_toast_ttl_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectsConfig {
    #[serde(default = "default_refresh_latency_ms")]
    pub refresh_latency_ms: u64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            refresh_latency_ms: default_refresh_latency_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurfaceConfig {
    #[serde(default = "default_min_height")]
    pub min_height: u32,
    #[serde(default = "default_padding")]
    pub padding: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            min_height: default_min_height(),
            padding: default_padding(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SandboxConfig {
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<Capability>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            capabilities: default_capabilities(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub bridge: BridgeConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub toasts: ToastConfig,

    #[serde(default)]
    pub effects: EffectsConfig,

    #[serde(default)]
    pub surface: SurfaceConfig,

    #[serde(default)]
    pub sandbox: SandboxConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            bridge: BridgeConfig::default(),
            session: SessionConfig::default(),
            toasts: ToastConfig::default(),
            effects: EffectsConfig::default(),
            surface: SurfaceConfig::default(),
            sandbox: SandboxConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_bridge_port() -> u16 {
    DEFAULT_BRIDGE_PORT
}
fn default_initial_view() -> String {
    ViewKey::Hello.to_string()
}
fn default_action_log_capacity() -> usize {
    DEFAULT_ACTION_LOG_CAPACITY
}
fn default_toast_ttl_ms() -> u64 {
    DEFAULT_TOAST_TTL.as_millis() as u64
}
fn default_refresh_latency_ms() -> u64 {
    DEFAULT_REFRESH_LATENCY.as_millis() as u64
}
fn default_min_height() -> u32 {
    DEFAULT_MIN_HEIGHT
}
fn default_padding() -> u32 {
    DEFAULT_HEIGHT_PADDING
}
fn default_capabilities() -> Vec<Capability> {
    vec![Capability::Scripts, Capability::Forms]
}

// ============================================
// IMPLEMENTATION
// ============================================

impl HostConfig {
    /// `{config_dir}/host.toml`.
    pub fn path(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE_NAME)
    }

    /// Load config from {config_dir}/host.toml.
    ///
    /// # Returns
    ///
    /// Returns defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read, parsed
    /// or validated.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = Self::path(config_dir);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: HostConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/host.toml using temp file + rename.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, directory creation,
    /// serialization, the write or the rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, contents).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        if self.bridge.port == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "bridge.port cannot be 0".to_string(),
            });
        }

        if let Some(ref token) = self.bridge.auth_token {
            if token.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    location: ErrorLocation::from(Location::caller()),
                    reason: "bridge.auth_token cannot be empty string".to_string(),
                });
            }
        }

        if let Err(reason) = self.session.initial_view.parse::<ViewKey>() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("session.initial_view: {reason}"),
            });
        }

        if self.session.action_log_capacity == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "session.action_log_capacity must be at least 1".to_string(),
            });
        }

        if self.toasts.ttl_ms == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "toasts.ttl_ms must be greater than 0".to_string(),
            });
        }

        let caps = &self.sandbox.capabilities;
        if caps.contains(&Capability::SameOrigin) && caps.contains(&Capability::Scripts) {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "sandbox.capabilities cannot combine same-origin with scripts"
                    .to_string(),
            });
        }

        Ok(())
    }

    /// The initial view; falls back to `hello` if the name is unknown.
    pub fn initial_view(&self) -> ViewKey {
        self.session
            .initial_view
            .parse()
            .unwrap_or(ViewKey::Hello)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toasts.ttl_ms)
    }

    pub fn refresh_latency(&self) -> Duration {
        Duration::from_millis(self.effects.refresh_latency_ms)
    }

    pub fn renderer_settings(&self) -> RendererSettings {
        RendererSettings {
            sandbox: SandboxPolicy::from_requested(self.sandbox.capabilities.iter().copied()),
            min_height: self.surface.min_height,
            padding: self.surface.padding,
        }
    }
}
