//! Data model for the UI resource/action protocol.
//!
//! This crate contains pure data structures: the [`Resource`] a producer asks
//! the host to render, the [`Action`] an isolated surface sends back, and the
//! JSON wire shapes both travel in. Nothing here performs I/O or keeps state.
//!
//! ## Architecture
//!
//! - **models** (this crate): resource, action and wire types
//! - **host-core**: generation, rendering, bridging and routing logic
//! - **playground**: process wiring

pub mod action;
pub mod builder;
pub mod error;
pub mod resource;
pub mod wire;

#[cfg(test)]
mod tests;

pub use action::{Action, ActionKind, ActionPayload};
pub use builder::ResourceBuilder;
pub use error::model_error::ModelError;
pub use resource::{
    ContentKind, Encoding, FrameworkTag, Resource, ResourceContent, ResourceMetadata,
};
pub use wire::{WireResource, WireResourceBody};

pub use common::ErrorLocation;

/// Scheme every generated resource uri uses.
pub const UI_URI_SCHEME: &str = "ui://";
