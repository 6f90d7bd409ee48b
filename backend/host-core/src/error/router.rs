use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Why a tool transition was not committed.
///
/// None of these are fatal; the router logs them and leaves state untouched.
#[derive(Debug, ThisError)]
pub enum RouterError {
    #[error("Unknown Tool Error: {tool_name} {location}")]
    UnknownTool {
        tool_name: String,
        location: ErrorLocation,
    },

    #[error("Invalid Params Error: {tool_name}: {message} {location}")]
    InvalidParams {
        tool_name: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Transition Rejected Error: {tool_name}: {message} {location}")]
    Rejected {
        tool_name: String,
        message: String,
        location: ErrorLocation,
    },
}
