//! Seams to the world outside the host.
//!
//! The router hands prompts and links to these traits instead of acting on
//! them. Tool calls from the host side go to a [`ToolBackend`]; the built-in
//! one is [`ViewCatalog`](crate::catalog::ViewCatalog).

use models::Resource;

use log::info;
use serde_json::{Map, Value};
use url::Url;

/// Receives prompt actions verbatim.
pub trait PromptForwarder: Send + Sync {
    fn forward_prompt(&self, prompt: &str);
}

/// Receives link actions; whether and how to navigate is up to the host.
pub trait LinkNavigator: Send + Sync {
    fn navigate(&self, url: &Url);
}

/// Executes a named tool and returns a resource to render.
pub trait ToolBackend: Send + Sync {
    fn call_tool(&self, name: &str, params: &Map<String, Value>) -> Result<Resource, String>;
}

/// Writes prompts and links to the log and does nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingCollaborator;

impl PromptForwarder for LoggingCollaborator {
    fn forward_prompt(&self, prompt: &str) {
        info!("Prompt from surface: {prompt}");
    }
}

impl LinkNavigator for LoggingCollaborator {
    fn navigate(&self, url: &Url) {
        info!("Link requested by surface: {url}");
    }
}
