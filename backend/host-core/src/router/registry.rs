//! Data-driven tool table.
//!
//! Each entry maps a tool name to a typed transition. Params are deserialized
//! into the transition's own struct before it runs, and the transition runs on
//! a draft copy of the state; the caller commits the draft only on success.

use crate::effects::EffectKind;
use crate::error::router::RouterError;
use crate::router::state::{ApplicationState, ViewKey};
use crate::router::toast::ToastRequest;

use common::ErrorLocation;

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FormatResult};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Side products of a committed transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionOutput {
    pub toast: Option<ToastRequest>,
    pub effect: Option<EffectKind>,
}

impl TransitionOutput {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_toast(toast: ToastRequest) -> Self {
        Self {
            toast: Some(toast),
            effect: None,
        }
    }

    pub fn with_effect(effect: EffectKind) -> Self {
        Self {
            toast: None,
            effect: Some(effect),
        }
    }
}

/// Failure reported by a transition body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Params parsed but their values are unusable.
    InvalidParams(String),
    /// Params are fine but the current state does not allow the change.
    Rejected(String),
}

/// Result of [`ToolRegistry::apply`]; `state` is the uncommitted draft.
#[derive(Debug, Clone)]
pub struct AppliedTransition {
    pub tool_name: String,
    pub view: ViewKey,
    pub state: ApplicationState,
    pub output: TransitionOutput,
}

type ApplyFn = dyn Fn(&mut ApplicationState, Map<String, Value>) -> Result<TransitionOutput, RouterError>
    + Send
    + Sync;

struct ToolEntry {
    view: ViewKey,
    apply: Box<ApplyFn>,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolEntry>,
    aliases: BTreeMap<String, String>,
}

impl ToolRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in transition.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::router::tools::register_builtins(&mut registry);
        registry
    }

    /// Registers `transition` under `name`, replacing any previous entry.
    ///
    /// `P` is the params type; an action whose params do not deserialize into
    /// it is rejected before `transition` runs.
    pub fn register<P, F>(&mut self, name: &str, view: ViewKey, transition: F)
    where
        P: DeserializeOwned + 'static,
        F: Fn(&mut ApplicationState, P) -> Result<TransitionOutput, TransitionError>
            + Send
            + Sync
            + 'static,
    {
        let tool_name = name.to_string();
        let apply = move |state: &mut ApplicationState, params: Map<String, Value>| {
            let params: P = serde_json::from_value(Value::Object(params)).map_err(|e| {
                RouterError::InvalidParams {
                    tool_name: tool_name.clone(),
                    message: e.to_string(),
                    location: ErrorLocation::caller(),
                }
            })?;

            transition(state, params).map_err(|failure| match failure {
                TransitionError::InvalidParams(message) => RouterError::InvalidParams {
                    tool_name: tool_name.clone(),
                    message,
                    location: ErrorLocation::caller(),
                },
                TransitionError::Rejected(message) => RouterError::Rejected {
                    tool_name: tool_name.clone(),
                    message,
                    location: ErrorLocation::caller(),
                },
            })
        };

        self.tools.insert(
            name.to_string(),
            ToolEntry {
                view,
                apply: Box::new(apply),
            },
        );
    }

    /// Makes `alias` dispatch to the tool registered as `target`.
    pub fn alias(&mut self, alias: &str, target: &str) {
        self.aliases.insert(alias.to_string(), target.to_string());
    }

    /// Canonical name for `name`, following at most one alias.
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.tools.contains_key(name) {
            return Some(name);
        }
        self.aliases
            .get(name)
            .map(String::as_str)
            .filter(|target| self.tools.contains_key(*target))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// View a tool's transition belongs to.
    pub fn view_of(&self, name: &str) -> Option<ViewKey> {
        self.resolve(name)
            .and_then(|canonical| self.tools.get(canonical))
            .map(|entry| entry.view)
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Runs `tool_name` against a clone of `state`.
    ///
    /// # Errors
    ///
    /// - [`RouterError::UnknownTool`] if no tool or alias matches
    /// - [`RouterError::InvalidParams`] if params fail to deserialize or validate
    /// - [`RouterError::Rejected`] if the transition refuses the change
    #[track_caller]
    pub fn apply(
        &self,
        tool_name: &str,
        state: &ApplicationState,
        params: Map<String, Value>,
    ) -> Result<AppliedTransition, RouterError> {
        let location = ErrorLocation::caller();
        let (canonical, entry) = self
            .resolve(tool_name)
            .and_then(|canonical| self.tools.get_key_value(canonical))
            .ok_or_else(|| RouterError::UnknownTool {
                tool_name: tool_name.to_string(),
                location,
            })?;

        let mut draft = state.clone();
        let output = (entry.apply)(&mut draft, params)?;

        Ok(AppliedTransition {
            tool_name: canonical.clone(),
            view: entry.view,
            state: draft,
            output,
        })
    }
}

impl Debug for ToolRegistry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter
            .debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .finish()
    }
}
