//! Resource Generator.
//!
//! Pure functions from `(view, &ApplicationState)` to a [`Resource`]. No clock,
//! no I/O, no randomness: the same inputs always yield byte-identical markup.

pub mod markup;
mod views;

use crate::router::state::{ApplicationState, ViewKey};

use log::debug;
use models::Resource;

/// Uri prefix of the resource returned for an unrecognised view key.
pub const FALLBACK_URI_BASE: &str = "ui://fallback/unknown-view";

/// Generates the resource for `view_key`.
///
/// An unknown key yields the fallback resource naming the requested key.
pub fn generate(view_key: &str, state: &ApplicationState) -> Resource {
    match view_key.parse::<ViewKey>() {
        Ok(key) => generate_view(key, state),
        Err(reason) => {
            debug!("{reason}, generating fallback");
            views::fallback(view_key)
        }
    }
}

/// Typed entry point for [`generate`].
pub fn generate_view(view: ViewKey, state: &ApplicationState) -> Resource {
    match view {
        ViewKey::Hello => views::hello(&state.hello),
        ViewKey::Counter => views::counter(&state.counter),
        ViewKey::Todo => views::todo(&state.todo),
        ViewKey::Form => views::form(&state.form),
        ViewKey::Chart => views::chart(&state.chart),
        ViewKey::Weather => views::weather(&state.weather),
        ViewKey::Dashboard => views::dashboard(&state.dashboard),
        ViewKey::Summary => views::summary(state),
    }
}
