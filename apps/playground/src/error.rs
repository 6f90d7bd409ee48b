use common::ErrorLocation;

use serde::Serialize;
use thiserror::Error;

/// Errors that stop the playground process.
///
/// Serializable so the binary can report them in the same JSON shape it uses
/// for the bridge connection file.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum PlaygroundError {
    /// Error from this App
    #[error("Playground Error: {message} {location}")]
    Playground {
        message: String,
        location: ErrorLocation,
    },

    /// Config could not be located, loaded or written
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// Error from host-core (session, bridge)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },
}
