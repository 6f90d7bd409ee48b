//! Starts a host session and its bridge server from `host.toml`.

use crate::connection::BridgeConnection;
use crate::error::PlaygroundError;

use host_core::bridge::{BridgeHub, BridgeServerHandle, start_bridge_server};
use host_core::{Collaborators, HostConfig, HostSession, SessionOptions};

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{info, warn};

/// A running session plus the bridge that feeds it.
pub struct RunningHost {
    config_dir: PathBuf,
    session: HostSession,
    bridge: BridgeServerHandle,
    connection: BridgeConnection,
}

impl RunningHost {
    /// Loads config from `config_dir`, starts the session, then the bridge.
    ///
    /// A missing `host.toml` is written out with defaults so it can be edited
    /// for the next run.
    ///
    /// # Errors
    ///
    /// Returns [`PlaygroundError::Config`] for an unreadable or invalid config
    /// and [`PlaygroundError::Core`] if the session or bridge fails to start.
    #[track_caller]
    pub async fn start(config_dir: &Path) -> Result<Self, PlaygroundError> {
        let config = load_or_create_config(config_dir)?;

        let hub = BridgeHub::new();
        let session = HostSession::start(
            SessionOptions::from_config(&config),
            hub.clone(),
            Collaborators::logging(),
        )
        .await
        .map_err(|e| PlaygroundError::Core {
            message: format!("Failed to start host session: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!("Starting bridge server on port {}", config.bridge.port);
        let bridge = match start_bridge_server(
            config.bridge.port,
            config.bridge.auth_token.clone(),
            hub,
            session.mount_feed(),
        )
        .await
        {
            Ok(bridge) => bridge,
            Err(e) => {
                if let Err(e) = session.shutdown().await {
                    warn!("Session shutdown after bridge failure: {e}");
                }
                return Err(PlaygroundError::Core {
                    message: format!("Failed to start bridge server: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let connection = BridgeConnection::new(bridge.local_addr().port(), bridge.auth_token());
        let path = connection.write(config_dir)?;
        info!("Bridge connection written to {}", path.display());

        Ok(Self {
            config_dir: config_dir.to_path_buf(),
            session,
            bridge,
            connection,
        })
    }

    pub fn session(&self) -> &HostSession {
        &self.session
    }

    pub fn connection(&self) -> &BridgeConnection {
        &self.connection
    }

    /// Closes the bridge first so no frame reaches a stopping session.
    pub async fn shutdown(self) -> Result<(), PlaygroundError> {
        self.bridge.shutdown().await;
        BridgeConnection::remove(&self.config_dir);
        self.session
            .shutdown()
            .await
            .map_err(|e| PlaygroundError::Core {
                message: format!("Failed to stop host session: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;
        info!("Host stopped");
        Ok(())
    }
}

/// Runs until Ctrl+C.
pub async fn run(config_dir: &Path) -> Result<(), PlaygroundError> {
    let host = RunningHost::start(config_dir).await?;
    info!("Bridge ready at {}", host.connection().url());

    let signal = tokio::signal::ctrl_c().await;
    if let Err(e) = signal {
        warn!("Failed to listen for Ctrl+C, stopping: {e}");
    } else {
        info!("Ctrl+C received, stopping");
    }

    host.shutdown().await
}

#[track_caller]
fn load_or_create_config(config_dir: &Path) -> Result<HostConfig, PlaygroundError> {
    let config = HostConfig::load(config_dir).map_err(|e| PlaygroundError::Config {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    if !HostConfig::path(config_dir).exists() {
        config.save(config_dir).map_err(|e| PlaygroundError::Config {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
    }

    Ok(config)
}
