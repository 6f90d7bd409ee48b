//! Frames exchanged over the bridge transport.

use crate::renderer::MountPlan;

use common::{Generation, SurfaceId};
use models::WireResource;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// First frame a client must send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthHandshake {
    pub token: String,
}

/// A message posted by a surface, tagged with the mount it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundFrame {
    pub surface: SurfaceId,
    pub generation: Generation,
    pub message: Value,
}

/// Host → client traffic.
///
/// Surfaces are only ever replaced wholesale; there is no partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OutboundFrame {
    AuthResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Mount {
        surface: SurfaceId,
        generation: Generation,
        resource: WireResource,
        plan: MountPlan,
    },
    Unrenderable {
        surface: SurfaceId,
        generation: Generation,
        reason: String,
    },
    Error {
        message: String,
    },
}
