//! Logging for the playground host.
//!
//! Console lines are short and colored; `playground.log` gets one
//! `key=value` record per line so it can be grepped by session or surface.
//! `UI_HOST_LOG` (from the environment or `.env`) overrides the level.

use crate::error::PlaygroundError;

use common::ErrorLocation;

use std::env;
use std::io::stderr;
use std::panic::Location;
use std::path::Path;
use std::str::FromStr;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{BrightBlack, Cyan, Green, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::{format_rfc3339_millis, format_rfc3339_seconds};
use log::{LevelFilter, debug, info};

pub const LOG_LEVEL_ENV: &str = "UI_HOST_LOG";

const LOG_FILE_NAME: &str = "playground.log";

static INIT: Once = Once::new();
static ATTEMPTED: AtomicBool = AtomicBool::new(false);

#[cfg(debug_assertions)]
const DEFAULT_LEVEL: LevelFilter = LevelFilter::Debug;

#[cfg(not(debug_assertions))]
const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// Crates whose chatter is capped regardless of the requested level.
const QUIET_TARGETS: &[(&str, LevelFilter)] = &[
    ("tungstenite", LevelFilter::Warn),
    ("tokio_tungstenite", LevelFilter::Warn),
];

/// Level named by `requested` (`off`, `error` .. `trace`, any case), else the
/// build default.
pub fn resolve_level(requested: Option<&str>) -> LevelFilter {
    requested
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| LevelFilter::from_str(value).ok())
        .unwrap_or(DEFAULT_LEVEL)
}

/// Last path segment of a log target: `host_core::session::actor` -> `actor`.
pub fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

/// Installs the global logger writing to stderr and `log_dir/playground.log`.
///
/// Repeat calls are no-ops that return `Ok`.
///
/// # Errors
///
/// Returns [`PlaygroundError::Playground`] if the log file cannot be opened or
/// another logger is already installed.
pub fn initialize(log_dir: &Path) -> Result<(), PlaygroundError> {
    if ATTEMPTED.swap(true, Ordering::SeqCst) {
        debug!("Logger already installed");
        return Ok(());
    }

    let level = resolve_level(env::var(LOG_LEVEL_ENV).ok().as_deref());
    let mut result = Ok(());
    INIT.call_once(|| {
        result = install(log_dir, level);
    });

    if result.is_ok() {
        info!("Logging at {level} to {}", log_dir.join(LOG_FILE_NAME).display());
    }
    result
}

#[track_caller]
fn install(log_dir: &Path, level: LevelFilter) -> Result<(), PlaygroundError> {
    let log_file_path = log_dir.join(LOG_FILE_NAME);
    let log_file = fern::log_file(&log_file_path).map_err(|e| PlaygroundError::Playground {
        message: format!("Failed to open {}: {e}", log_file_path.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let colors = ColoredLevelConfig::new()
        .error(Red)
        .warn(Yellow)
        .info(Green)
        .debug(Cyan)
        .trace(BrightBlack);

    let console = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{time} {level} {target:<12} {message}",
                time = format_rfc3339_seconds(SystemTime::now()),
                level = colors.color(record.level()),
                target = short_target(record.target()),
            ))
        })
        .chain(stderr());

    let file = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "ts={time} level={level} target={target} msg={message}",
                time = format_rfc3339_millis(SystemTime::now()),
                level = record.level().as_str().to_ascii_lowercase(),
                target = record.target(),
            ))
        })
        .chain(log_file);

    QUIET_TARGETS
        .iter()
        .fold(Dispatch::new().level(level), |dispatch, (target, cap)| {
            dispatch.level_for(*target, (*cap).min(level))
        })
        .chain(console)
        .chain(file)
        .apply()
        .map_err(|e| PlaygroundError::Playground {
            message: format!("Failed to install logger: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
}
