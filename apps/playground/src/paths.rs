//! Where the playground keeps its files.

use crate::error::PlaygroundError;

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};

/// Overrides the config directory; may come from `.env`.
pub const CONFIG_DIR_ENV: &str = "UI_HOST_CONFIG_DIR";

const APP_DIR_NAME: &str = "ui-host";
const LOG_DIR_NAME: &str = "logs";

/// `$UI_HOST_CONFIG_DIR`, else `<platform config dir>/ui-host`.
///
/// # Errors
///
/// Returns [`PlaygroundError::Config`] when the variable is unset and the
/// platform has no config directory.
#[track_caller]
pub fn config_dir() -> Result<PathBuf, PlaygroundError> {
    resolve_config_dir(env::var_os(CONFIG_DIR_ENV).map(PathBuf::from), dirs::config_dir())
}

/// Resolution rule behind [`config_dir`], without touching the environment.
#[track_caller]
pub fn resolve_config_dir(
    overridden: Option<PathBuf>,
    platform: Option<PathBuf>,
) -> Result<PathBuf, PlaygroundError> {
    if let Some(dir) = overridden.filter(|dir| !dir.as_os_str().is_empty()) {
        return Ok(dir);
    }

    platform
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| PlaygroundError::Config {
            message: format!("No config directory available; set {CONFIG_DIR_ENV}"),
            location: ErrorLocation::from(Location::caller()),
        })
}

pub fn log_dir(config_dir: &Path) -> PathBuf {
    config_dir.join(LOG_DIR_NAME)
}
