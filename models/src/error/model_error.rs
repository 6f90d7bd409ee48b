use crate::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ModelError {
    #[error("Validation Error: {message} {location}")]
    Validation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Wire Format Error: {message} {location}")]
    Wire {
        message: String,
        location: ErrorLocation,
    },

    #[error("Encoding Error: {message} {location}")]
    Encoding {
        message: String,
        location: ErrorLocation,
    },
}

impl From<base64::DecodeError> for ModelError {
    #[track_caller]
    fn from(error: base64::DecodeError) -> Self {
        ModelError::Encoding {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<std::string::FromUtf8Error> for ModelError {
    #[track_caller]
    fn from(error: std::string::FromUtf8Error) -> Self {
        ModelError::Encoding {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<url::ParseError> for ModelError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ModelError::Wire {
            message: format!("Invalid URL: {error}"),
            location: ErrorLocation::caller(),
        }
    }
}
