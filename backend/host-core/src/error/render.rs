use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RenderError {
    #[error("Unsupported Framework Error: no adapter registered for '{framework}' {location}")]
    UnsupportedFramework {
        framework: String,
        location: ErrorLocation,
    },
}
