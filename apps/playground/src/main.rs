use playground::app::run;
use playground::error::PlaygroundError;
use playground::logger::initialize as LoggerInitialize;
use playground::paths::{config_dir, log_dir};

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::process::ExitCode;

use log::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    match start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            match serde_json::to_string(&e) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{e}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn start() -> Result<(), PlaygroundError> {
    // Read before resolving paths so .env can set UI_HOST_CONFIG_DIR
    let dotenv = dotenvy::dotenv();

    let config_dir = config_dir()?;
    let log_dir = log_dir(&config_dir);

    create_dir_all(&log_dir).map_err(|e| PlaygroundError::Playground {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir)?;

    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Ignoring unreadable .env: {e}"),
    }

    info!("UI host playground starting");
    info!("Config directory: {}", config_dir.display());
    info!("Log directory: {}", log_dir.display());

    run(&config_dir).await
}
