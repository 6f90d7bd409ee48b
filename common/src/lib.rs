//! Shared primitives for the UI host workspace.
//!
//! This crate holds the small pieces every other crate needs:
//!
//! - [`ErrorLocation`] for source-located error variants
//! - [`SurfaceId`] and [`Generation`] which identify one isolated rendering
//!   surface and one mount lifetime of it
//!
//! ## Architecture
//!
//! - **common** (this crate): identifiers and error plumbing
//! - **models**: resource/action data model and wire format
//! - **host-core**: generator, renderer, bridge and router
//! - **playground**: process wiring and logging

pub mod error;
pub mod surface;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use surface::{Generation, SurfaceId};
