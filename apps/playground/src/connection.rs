//! Connection details a bridge client needs.
//!
//! Written next to `host.toml` once the bridge is listening, so a surface
//! runner on the same machine can find the port and token.

use crate::error::PlaygroundError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const CONNECTION_FILE_NAME: &str = "bridge.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConnection {
    url: String,
    port: u16,
    auth_token: String,
}

impl BridgeConnection {
    pub fn new(port: u16, auth_token: impl Into<String>) -> Self {
        Self {
            url: format!("{}:{port}", host_core::BRIDGE_BASE_URL),
            port,
            auth_token: auth_token.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn path(config_dir: &Path) -> PathBuf {
        config_dir.join(CONNECTION_FILE_NAME)
    }

    /// Writes `bridge.json` into `config_dir`.
    #[track_caller]
    pub fn write(&self, config_dir: &Path) -> Result<PathBuf, PlaygroundError> {
        let path = Self::path(config_dir);
        let contents =
            serde_json::to_string_pretty(self).map_err(|e| PlaygroundError::Playground {
                message: format!("Failed to serialize bridge connection: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;
        std::fs::write(&path, contents).map_err(|e| PlaygroundError::Playground {
            message: format!("Failed to write {}: {e}", path.display()),
            location: ErrorLocation::from(Location::caller()),
        })?;
        Ok(path)
    }

    #[track_caller]
    pub fn read(config_dir: &Path) -> Result<Self, PlaygroundError> {
        let path = Self::path(config_dir);
        let contents = std::fs::read_to_string(&path).map_err(|e| PlaygroundError::Playground {
            message: format!("Failed to read {}: {e}", path.display()),
            location: ErrorLocation::from(Location::caller()),
        })?;
        serde_json::from_str(&contents).map_err(|e| PlaygroundError::Playground {
            message: format!("Invalid bridge connection file: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Best-effort removal on shutdown.
    pub fn remove(config_dir: &Path) {
        // Already gone is fine.
        let _ = std::fs::remove_file(Self::path(config_dir));
    }
}
