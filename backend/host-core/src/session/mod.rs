//! Host session orchestration using the actor pattern.
//!
//! One tokio task owns the router, the renderer and the effect scheduler.
//! Everything that changes them arrives as a message and is handled in
//! order:
//!
//! - [`SessionCommand`]s sent through a [`HostSession`] handle
//! - frames from the session's bridge route
//! - completions of deferred effects
//!
//! Reads go through a [`SessionSnapshot`] behind `Arc<RwLock<_>>`, refreshed
//! after every handled message.

mod actor;

use crate::bridge::{BridgeHub, MountFeed, OutboundFrame};
use crate::catalog::ViewCatalog;
use crate::collaborators::{LinkNavigator, LoggingCollaborator, PromptForwarder, ToolBackend};
use crate::config::{HostConfig, StaleActionPolicy};
use crate::effects::{EffectScheduler, Ticket};
use crate::error::session::SessionError;
use crate::renderer::{
    AdapterRegistry, IsolationRenderer, RendererSettings, SurfaceSize, SurfaceStatus,
};
use crate::router::{ActionLogEntry, ActionRouter, ApplicationState, Toast, ToolRegistry, ViewKey};

use common::{ErrorLocation, Generation, SurfaceId};
use models::Action;

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use serde_json::{Map, Value};
use tokio::sync::{RwLock, mpsc, oneshot, watch};

/// Surface id used for the session's single rendering slot.
pub const MAIN_SURFACE: &str = "main";

const COMMAND_BUFFER: usize = 100;
const INBOX_BUFFER: usize = 100;
const COMPLETION_BUFFER: usize = 16;

/// Session settings, usually derived from a [`HostConfig`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub surface: SurfaceId,
    pub initial_view: ViewKey,
    pub action_log_capacity: usize,
    pub stale_action_policy: StaleActionPolicy,
    pub toast_ttl: Duration,
    pub refresh_latency: Duration,
    pub renderer: RendererSettings,
}

impl SessionOptions {
    pub fn from_config(config: &HostConfig) -> Self {
        Self {
            surface: SurfaceId::new(MAIN_SURFACE),
            initial_view: config.initial_view(),
            action_log_capacity: config.session.action_log_capacity,
            stale_action_policy: config.session.stale_action_policy,
            toast_ttl: config.toast_ttl(),
            refresh_latency: config.refresh_latency(),
            renderer: config.renderer_settings(),
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&HostConfig::default())
    }
}

/// Where prompt and link actions go, and who answers host-side tool calls.
#[derive(Clone)]
pub struct Collaborators {
    pub prompts: Arc<dyn PromptForwarder>,
    pub links: Arc<dyn LinkNavigator>,
    pub tools: Arc<dyn ToolBackend>,
}

impl Collaborators {
    /// Prompts and links are only logged; tools come from the built-in
    /// [`ViewCatalog`].
    pub fn logging() -> Self {
        Self {
            prompts: Arc::new(LoggingCollaborator),
            links: Arc::new(LoggingCollaborator),
            tools: Arc::new(ViewCatalog::default()),
        }
    }
}

/// Commands processed by the session actor.
#[derive(Debug)]
pub enum SessionCommand {
    /// Switch the surface to another view.
    Navigate(ViewKey),

    /// Dispatch an action as if it came from `generation` of the surface.
    Dispatch {
        action: Action,
        generation: Generation,
    },

    /// The host could not embed the external content of `generation`.
    ReportEmbedFailure { generation: Generation },

    /// Call a tool on the backend and mount its resource.
    Present {
        tool: String,
        params: Map<String, Value>,
        reply: oneshot::Sender<Result<(), String>>,
    },

    /// Replies once every earlier message has been handled.
    Barrier(oneshot::Sender<()>),

    /// Cancels pending effects, unmounts and stops the actor.
    Shutdown(oneshot::Sender<()>),
}

/// Read-only view of a session after its last handled message.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub surface: SurfaceId,
    pub active_view: ViewKey,
    pub generation: Generation,
    pub status: SurfaceStatus,
    pub state: ApplicationState,
    /// Most recent first.
    pub action_log: Vec<ActionLogEntry>,
    pub toasts: Vec<Toast>,
    pub size: Option<SurfaceSize>,
    pub last_frame: Option<OutboundFrame>,
    /// Last diagnostic from a tool action that was not applied.
    pub last_rejection: Option<String>,
    /// Uri of a tool-provided resource currently shown instead of the view.
    pub presented_uri: Option<String>,
    pub pending_effect: Option<Ticket>,
}

impl SessionSnapshot {
    fn initial(surface: SurfaceId, active_view: ViewKey, state: ApplicationState) -> Self {
        Self {
            surface,
            active_view,
            generation: Generation::UNMOUNTED,
            status: SurfaceStatus::Unmounted,
            state,
            action_log: Vec::new(),
            toasts: Vec::new(),
            size: None,
            last_frame: None,
            last_rejection: None,
            presented_uri: None,
            pending_effect: None,
        }
    }
}

/// Handle to a running session. Clones share the same actor.
#[derive(Clone)]
pub struct HostSession {
    commands: mpsc::Sender<SessionCommand>,
    snapshot: Arc<RwLock<SessionSnapshot>>,
    mounts: MountFeed,
}

impl HostSession {
    /// Spawns the session actor and waits for the initial mount.
    ///
    /// Inbound frames for `options.surface` are taken from `hub`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the actor stops before the
    /// initial mount completes.
    pub async fn start(
        options: SessionOptions,
        hub: BridgeHub,
        collaborators: Collaborators,
    ) -> Result<Self, SessionError> {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (inbox_tx, inbox_rx) = mpsc::channel(INBOX_BUFFER);
        let (completion_tx, completion_rx) = mpsc::channel(COMPLETION_BUFFER);
        let (mount_tx, mount_rx) = watch::channel(None);

        let state = ApplicationState::new();
        let snapshot = Arc::new(RwLock::new(SessionSnapshot::initial(
            options.surface.clone(),
            options.initial_view,
            state.clone(),
        )));

        let router = ActionRouter::new(
            state,
            ToolRegistry::with_builtins(),
            options.action_log_capacity,
            options.toast_ttl,
            collaborators.prompts,
            collaborators.links,
        );
        let renderer =
            IsolationRenderer::new(options.renderer.clone(), AdapterRegistry::with_builtins());
        let effects = EffectScheduler::new(options.refresh_latency, completion_tx);

        let actor = actor::SessionActor::new(
            options.clone(),
            router,
            renderer,
            effects,
            collaborators.tools,
            hub,
            inbox_tx,
            Arc::clone(&snapshot),
            mount_tx,
        );
        tokio::spawn(actor.run(command_rx, inbox_rx, completion_rx));

        let session = Self {
            commands: command_tx,
            snapshot,
            mounts: mount_rx,
        };
        session.barrier().await?;
        info!(
            "Host session started on surface {} with view {}",
            options.surface, options.initial_view
        );
        Ok(session)
    }

    /// Starts a session with default options and logging collaborators.
    pub async fn start_default(hub: BridgeHub) -> Result<Self, SessionError> {
        Self::start(SessionOptions::default(), hub, Collaborators::logging()).await
    }

    async fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|e| SessionError::Closed {
                message: format!("Session actor stopped: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    pub async fn navigate(&self, view: ViewKey) -> Result<(), SessionError> {
        self.send(SessionCommand::Navigate(view)).await
    }

    pub async fn dispatch(
        &self,
        action: Action,
        generation: Generation,
    ) -> Result<(), SessionError> {
        self.send(SessionCommand::Dispatch { action, generation })
            .await
    }

    pub async fn report_embed_failure(&self, generation: Generation) -> Result<(), SessionError> {
        self.send(SessionCommand::ReportEmbedFailure { generation })
            .await
    }

    /// Asks the tool backend for `tool` and mounts the resource it returns.
    ///
    /// The resource stays until the next navigation or state-changing action,
    /// which regenerates the active view.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Tool`] with the backend's description when the
    /// tool is unknown or its params are rejected.
    pub async fn present_tool(
        &self,
        tool: &str,
        params: Map<String, Value>,
    ) -> Result<(), SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SessionCommand::Present {
            tool: tool.to_string(),
            params,
            reply: reply_tx,
        })
        .await?;
        let result = reply_rx.await.map_err(|e| SessionError::Closed {
            message: format!("Session actor dropped tool call: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;
        result.map_err(|message| SessionError::Tool {
            message,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Waits until everything sent before this call has been handled.
    pub async fn barrier(&self) -> Result<(), SessionError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(SessionCommand::Barrier(ack_tx)).await?;
        ack_rx.await.map_err(|e| SessionError::Closed {
            message: format!("Session actor dropped barrier: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Tears the session down and waits for the actor to finish.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(SessionCommand::Shutdown(ack_tx)).await?;
        ack_rx.await.map_err(|e| SessionError::Closed {
            message: format!("Session actor dropped shutdown: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Latest outbound frame, for the bridge server.
    pub fn mount_feed(&self) -> MountFeed {
        self.mounts.clone()
    }
}
