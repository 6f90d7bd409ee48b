//! The session actor task.

use super::{SessionCommand, SessionOptions, SessionSnapshot};
use crate::bridge::envelope::{self, BridgeMessage};
use crate::collaborators::ToolBackend;
use crate::bridge::{BridgeHub, InboundFrame, OutboundFrame, Subscription};
use crate::config::StaleActionPolicy;
use crate::effects::{EffectCompletion, EffectScheduler};
use crate::generator::generate_view;
use crate::renderer::{IsolationRenderer, MountOutcome, MountPlan, SurfaceStatus};
use crate::router::{ActionRouter, ViewKey};

use common::Generation;
use models::{Action, Resource};

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use serde_json::{Map, Value};
use tokio::sync::{RwLock, mpsc, oneshot, watch};

type PresentReply = (oneshot::Sender<Result<(), String>>, Result<(), String>);

pub(super) struct SessionActor {
    options: SessionOptions,
    active_view: ViewKey,
    router: ActionRouter,
    renderer: IsolationRenderer,
    effects: EffectScheduler,
    tools: Arc<dyn ToolBackend>,
    /// Producer resource shown in place of the active view until the next
    /// navigation or state change.
    presented: Option<Resource>,
    hub: BridgeHub,
    inbox: mpsc::Sender<InboundFrame>,
    subscription: Option<Subscription>,
    snapshot: Arc<RwLock<SessionSnapshot>>,
    mounts: watch::Sender<Option<OutboundFrame>>,
    last_frame: Option<OutboundFrame>,
    last_rejection: Option<String>,
}

impl SessionActor {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        options: SessionOptions,
        router: ActionRouter,
        renderer: IsolationRenderer,
        effects: EffectScheduler,
        tools: Arc<dyn ToolBackend>,
        hub: BridgeHub,
        inbox: mpsc::Sender<InboundFrame>,
        snapshot: Arc<RwLock<SessionSnapshot>>,
        mounts: watch::Sender<Option<OutboundFrame>>,
    ) -> Self {
        Self {
            active_view: options.initial_view,
            options,
            router,
            renderer,
            effects,
            tools,
            presented: None,
            hub,
            inbox,
            subscription: None,
            snapshot,
            mounts,
            last_frame: None,
            last_rejection: None,
        }
    }

    /// Processes messages until shut down or every handle is dropped.
    ///
    /// Bridge frames are preferred over effect completions, and both over
    /// commands, so a command sent after a frame was routed observes it.
    pub(super) async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut inbox: mpsc::Receiver<InboundFrame>,
        mut completions: mpsc::Receiver<EffectCompletion>,
    ) {
        info!("Session actor started");
        self.remount();
        self.publish().await;

        loop {
            let mut ack: Option<oneshot::Sender<()>> = None;
            let mut presented: Option<PresentReply> = None;
            let mut stop = false;

            tokio::select! {
                biased;
                Some(frame) = inbox.recv() => self.handle_frame(frame),
                Some(completion) = completions.recv() => self.handle_completion(completion),
                command = commands.recv() => match command {
                    Some(SessionCommand::Shutdown(reply)) => {
                        self.teardown();
                        ack = Some(reply);
                        stop = true;
                    }
                    Some(SessionCommand::Barrier(reply)) => ack = Some(reply),
                    Some(SessionCommand::Present { tool, params, reply }) => {
                        let result = self.present(&tool, &params);
                        presented = Some((reply, result));
                    }
                    Some(command) => self.handle_command(command),
                    None => {
                        self.teardown();
                        stop = true;
                    }
                },
            }

            self.publish().await;
            // Replies go out after publishing so callers see the new snapshot.
            // A waiter that gave up is not an error.
            if let Some(reply) = ack {
                let _ = reply.send(());
            }
            if let Some((reply, result)) = presented {
                let _ = reply.send(result);
            }
            if stop {
                break;
            }
        }

        info!("Session actor stopped");
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Navigate(view) => self.navigate(view),
            SessionCommand::Dispatch { action, generation } => {
                self.handle_action(action, generation)
            }
            SessionCommand::ReportEmbedFailure { generation } => {
                self.handle_embed_failure(generation)
            }
            SessionCommand::Present { .. }
            | SessionCommand::Barrier(_)
            | SessionCommand::Shutdown(_) => {}
        }
    }

    fn handle_frame(&mut self, frame: InboundFrame) {
        if frame.surface != self.options.surface {
            debug!("Dropping frame for foreign surface {}", frame.surface);
            return;
        }

        match envelope::decode(&frame.message) {
            BridgeMessage::Action(action) => self.handle_action(action, frame.generation),
            BridgeMessage::SizeChange(size) => {
                match self
                    .renderer
                    .report_size(&self.options.surface, frame.generation, size)
                {
                    Some(applied) => debug!("Surface resized to {}x{}", applied.width, applied.height),
                    None => debug!("Ignoring size report from {}", frame.generation),
                }
            }
            BridgeMessage::Ignored { message_type } => {
                debug!("Ignoring message of type {:?}", message_type);
            }
            BridgeMessage::Malformed { reason } => {
                debug!("Dropping malformed envelope: {}", reason);
            }
        }
    }

    fn handle_action(&mut self, action: Action, generation: Generation) {
        let current = self.renderer.current_generation(&self.options.surface);
        if generation.is_ahead_of(current) {
            warn!(
                "Discarding {} action from unmounted {} (current {})",
                action.kind(),
                generation,
                current
            );
            return;
        }
        if generation.is_stale_against(current) {
            match self.options.stale_action_policy {
                StaleActionPolicy::Discard => {
                    debug!(
                        "Discarding {} action from {} (current {})",
                        action.kind(),
                        generation,
                        current
                    );
                    return;
                }
                StaleActionPolicy::Accept => {
                    debug!(
                        "Accepting {} action from {} (current {})",
                        action.kind(),
                        generation,
                        current
                    );
                }
            }
        }

        let outcome = self.router.dispatch(action, Instant::now());
        self.last_rejection = outcome.rejection.as_ref().map(ToString::to_string);

        if let Some(kind) = outcome.effect {
            self.effects.schedule(kind);
        }
        if outcome.state_changed {
            self.presented = None;
            self.remount();
        }
    }

    fn handle_completion(&mut self, completion: EffectCompletion) {
        if !self.effects.take_if_current(&completion) {
            return;
        }
        let changed = self.router.complete_effect(completion, Instant::now());
        if changed && completion.kind.view() == self.active_view && self.presented.is_none() {
            self.remount();
        }
    }

    fn navigate(&mut self, view: ViewKey) {
        if view == self.active_view && self.presented.is_none() {
            return;
        }
        if view != self.active_view {
            if let Some(kind) = self.effects.cancel(self.active_view) {
                self.router.cancel_effect(kind);
            }
        }
        info!("Navigating from {} to {}", self.active_view, view);
        self.presented = None;
        self.active_view = view;
        self.remount();
    }

    /// Mounts the resource `tool` returns in place of the active view.
    fn present(&mut self, tool: &str, params: &Map<String, Value>) -> Result<(), String> {
        let resource = self.tools.call_tool(tool, params).map_err(|reason| {
            warn!("Tool {tool} failed: {reason}");
            reason
        })?;
        info!("Presenting {} from tool {}", resource.uri(), tool);
        self.presented = Some(resource);
        self.remount();
        Ok(())
    }

    fn handle_embed_failure(&mut self, generation: Generation) {
        let Some(document) = self
            .renderer
            .report_embed_failure(&self.options.surface, generation)
        else {
            debug!("Ignoring embed failure for {}", generation);
            return;
        };

        let resource = self.current_resource();
        let sandbox = self.renderer.settings().sandbox.clone();
        self.publish_frame(OutboundFrame::Mount {
            surface: self.options.surface.clone(),
            generation,
            resource: resource.to_wire(),
            plan: MountPlan::Sandboxed { document, sandbox },
        });
    }

    fn current_resource(&self) -> Resource {
        self.presented
            .clone()
            .unwrap_or_else(|| generate_view(self.active_view, self.router.state()))
    }

    /// Regenerates the active view (or the presented resource) and mounts it
    /// if the document changed.
    fn remount(&mut self) {
        let resource = self.current_resource();
        let surface = self.options.surface.clone();

        match self.renderer.mount(&surface, &resource) {
            Ok(MountOutcome::Mounted { generation, plan }) => {
                self.subscription =
                    Some(self.hub.subscribe(surface.clone(), generation, self.inbox.clone()));
                self.publish_frame(OutboundFrame::Mount {
                    surface,
                    generation,
                    resource: resource.to_wire(),
                    plan,
                });
            }
            Ok(MountOutcome::Unchanged { generation }) => {
                debug!("{} unchanged at {}", resource.uri(), generation);
            }
            Err(e) => {
                warn!("Surface {} is unrenderable: {}", surface, e);
                self.subscription = None;
                let generation = self.renderer.current_generation(&surface);
                self.publish_frame(OutboundFrame::Unrenderable {
                    surface,
                    generation,
                    reason: e.to_string(),
                });
            }
        }
    }

    fn teardown(&mut self) {
        for kind in self.effects.cancel_all() {
            self.router.cancel_effect(kind);
        }
        self.subscription = None;
        self.renderer.unmount(&self.options.surface);
        info!("Session on {} torn down", self.options.surface);
    }

    fn publish_frame(&mut self, frame: OutboundFrame) {
        self.mounts.send_replace(Some(frame.clone()));
        self.last_frame = Some(frame);
    }

    async fn publish(&mut self) {
        let surface = self.renderer.surface(&self.options.surface);
        let snapshot = SessionSnapshot {
            surface: self.options.surface.clone(),
            active_view: self.active_view,
            generation: surface
                .map(|surface| surface.generation)
                .unwrap_or(Generation::UNMOUNTED),
            status: surface
                .map(|surface| surface.status)
                .unwrap_or(SurfaceStatus::Unmounted),
            state: self.router.state().clone(),
            action_log: self.router.log().snapshot(),
            toasts: self.router.active_toasts(Instant::now()),
            size: surface.and_then(|surface| surface.size),
            last_frame: self.last_frame.clone(),
            last_rejection: self.last_rejection.clone(),
            presented_uri: self
                .presented
                .as_ref()
                .map(|resource| resource.uri().to_string()),
            pending_effect: self.effects.pending_ticket(self.active_view),
        };
        *self.snapshot.write().await = snapshot;
    }
}
