use crate::error::render::RenderError;

use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error("Session Closed Error: {message} {location}")]
    Closed {
        message: String,
        location: ErrorLocation,
    },

    #[error("Tool Error: {message} {location}")]
    Tool {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}
