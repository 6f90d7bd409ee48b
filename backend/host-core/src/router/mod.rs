//! Action Router / State Reducer.
//!
//! The router exclusively owns the [`ApplicationState`]. Every accepted
//! action is logged first, then dispatched by kind:
//!
//! - tool actions run a [`ToolRegistry`] transition on a draft and commit it
//!   only on success
//! - prompt actions go to the [`PromptForwarder`]
//! - link actions go to the [`LinkNavigator`]
//!
//! Failures are diagnostics, never panics; state is either fully updated or
//! left as it was.

pub mod action_log;
pub mod registry;
pub mod state;
pub mod toast;
pub mod tools;

pub use action_log::{ActionLog, ActionLogEntry};
pub use registry::{ToolRegistry, TransitionError, TransitionOutput};
pub use state::{ApplicationState, ViewKey};
pub use toast::{Toast, ToastLevel, ToastQueue, ToastRequest};

use crate::collaborators::{LinkNavigator, PromptForwarder};
use crate::effects::{EffectCompletion, EffectKind};
use crate::error::router::RouterError;

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use log::{debug, warn};
use models::{Action, ActionKind};

/// What happened to one dispatched action.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub sequence_id: u64,
    pub kind: ActionKind,
    /// The committed transition changed state; the active view should be
    /// regenerated.
    pub state_changed: bool,
    /// View the committed transition belongs to.
    pub view: Option<ViewKey>,
    /// Deferred work the transition asked for.
    pub effect: Option<EffectKind>,
    /// Why a tool transition was not committed.
    pub rejection: Option<RouterError>,
}

impl DispatchOutcome {
    fn logged(sequence_id: u64, kind: ActionKind) -> Self {
        Self {
            sequence_id,
            kind,
            state_changed: false,
            view: None,
            effect: None,
            rejection: None,
        }
    }
}

pub struct ActionRouter {
    state: ApplicationState,
    registry: ToolRegistry,
    log: ActionLog,
    toasts: ToastQueue,
    prompts: Arc<dyn PromptForwarder>,
    links: Arc<dyn LinkNavigator>,
}

impl ActionRouter {
    pub fn new(
        state: ApplicationState,
        registry: ToolRegistry,
        log_capacity: usize,
        toast_ttl: Duration,
        prompts: Arc<dyn PromptForwarder>,
        links: Arc<dyn LinkNavigator>,
    ) -> Self {
        Self {
            state,
            registry,
            log: ActionLog::new(log_capacity),
            toasts: ToastQueue::new(toast_ttl),
            prompts,
            links,
        }
    }

    /// Logs `action`, then applies it.
    ///
    /// `now` stamps any toast the transition raises.
    pub fn dispatch(&mut self, action: Action, now: Instant) -> DispatchOutcome {
        let sequence_id = self.log.append(action.clone(), SystemTime::now());
        let mut outcome = DispatchOutcome::logged(sequence_id, action.kind());

        match action {
            Action::Tool { tool_name, params } => {
                match self.registry.apply(&tool_name, &self.state, params) {
                    Ok(applied) => {
                        outcome.state_changed = applied.state != self.state;
                        outcome.view = Some(applied.view);
                        outcome.effect = applied.output.effect;
                        self.state = applied.state;
                        if let Some(toast) = applied.output.toast {
                            self.toasts.push(toast, now);
                        }
                        debug!(
                            "Action {sequence_id} applied {} (changed: {})",
                            applied.tool_name, outcome.state_changed
                        );
                    }
                    Err(e) => {
                        warn!("Action {sequence_id} not applied: {e}");
                        outcome.rejection = Some(e);
                    }
                }
            }
            Action::Prompt { prompt } => self.prompts.forward_prompt(&prompt),
            Action::Link { url } => self.links.navigate(&url),
        }

        outcome
    }

    /// Applies a claimed effect completion; returns whether state changed.
    pub fn complete_effect(&mut self, completion: EffectCompletion, now: Instant) -> bool {
        let mut draft = self.state.clone();
        let toast = completion.kind.complete(&mut draft, completion.ticket);
        let changed = draft != self.state;
        self.state = draft;
        if let Some(toast) = toast {
            self.toasts.push(toast, now);
        }
        changed
    }

    /// Reverts the in-progress marker of a cancelled effect.
    pub fn cancel_effect(&mut self, kind: EffectKind) -> bool {
        let before = self.state.clone();
        kind.cancel(&mut self.state);
        before != self.state
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Toasts still alive at `now`.
    pub fn active_toasts(&mut self, now: Instant) -> Vec<Toast> {
        self.toasts.active(now).to_vec()
    }
}
