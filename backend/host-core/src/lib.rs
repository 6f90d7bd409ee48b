//! Host side of the UI resource/action protocol.
//!
//! A producer describes content as a [`models::Resource`]; the host renders it
//! inside an isolated surface and receives [`models::Action`]s back over a
//! message bridge. Nothing a surface sends can touch host state except
//! through the router's registered transitions.
//!
//! ```text
//! generator ──Resource──▶ renderer ──MountPlan──▶ surface
//!     ▲                                              │
//!     │ &ApplicationState                            │ postMessage
//!     │                                              ▼
//!  router ◀──────────────Action────────────────── bridge
//! ```
//!
//! [`session::HostSession`] wires the pieces into one actor per session; the
//! binary only loads config and starts it alongside the bridge server.

pub mod bridge;
pub mod catalog;
pub mod collaborators;
pub mod config;
pub mod effects;
pub mod error;
pub mod generator;
pub mod renderer;
pub mod router;
pub mod session;

#[cfg(test)]
mod tests;

pub use config::{HostConfig, StaleActionPolicy};
pub use error::CoreError;
pub use generator::{generate, generate_view};
pub use router::{ActionRouter, ApplicationState, ViewKey};
pub use session::{Collaborators, HostSession, SessionOptions, SessionSnapshot};

/// Host the bridge server binds to.
pub const BRIDGE_HOSTNAME: &str = "127.0.0.1";

/// Base WebSocket url for a bridge bound to `BRIDGE_HOSTNAME`.
pub const BRIDGE_BASE_URL: &str = const_format::concatcp!("ws://", BRIDGE_HOSTNAME);
