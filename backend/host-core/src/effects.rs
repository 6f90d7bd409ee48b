//! Deferred completions requested by transitions.
//!
//! Each view has at most one pending effect. Scheduling a second one aborts
//! the first; a completion is only honoured if its ticket is still the one
//! recorded for its view, so the latest request always wins.
//!
//! Effects are scoped to a view, not to a mount: remounting the same view
//! keeps them, leaving the view cancels them.

use crate::router::state::{ApplicationState, ViewKey};
use crate::router::toast::ToastRequest;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::time::Duration;

use log::{debug, info};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_REFRESH_LATENCY: Duration = Duration::from_millis(800);

/// Kinds of deferred work a transition can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectKind {
    /// Simulated weather fetch; sets a new reading and clears `loading`.
    WeatherRefresh,
}

impl EffectKind {
    pub fn view(self) -> ViewKey {
        match self {
            EffectKind::WeatherRefresh => ViewKey::Weather,
        }
    }

    /// Applies the completion. The reading is derived from `ticket`, so
    /// replaying the same ticket yields the same state.
    pub fn complete(self, state: &mut ApplicationState, ticket: Ticket) -> Option<ToastRequest> {
        match self {
            EffectKind::WeatherRefresh => {
                let seed = ticket.value();
                let reading = &mut state.weather.reading;
                reading.temp_f = 65 + (seed.wrapping_mul(7) % 20) as i32;
                reading.humidity = 30 + (seed.wrapping_mul(13) % 50) as u32;
                state.weather.loading = false;
                Some(ToastRequest::success("Weather updated"))
            }
        }
    }

    /// Undoes the visible "in progress" part of the request.
    pub fn cancel(self, state: &mut ApplicationState) {
        match self {
            EffectKind::WeatherRefresh => state.weather.loading = false,
        }
    }
}

/// Monotonic id of one effect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Display for Ticket {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "#{}", self.0)
    }
}

/// Sent back to the owner when an effect's delay elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectCompletion {
    pub kind: EffectKind,
    pub ticket: Ticket,
}

#[derive(Debug)]
struct PendingEffect {
    kind: EffectKind,
    ticket: Ticket,
    task: JoinHandle<()>,
}

/// Owns the timers of pending effects.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct EffectScheduler {
    latency: Duration,
    next_ticket: u64,
    pending: BTreeMap<ViewKey, PendingEffect>,
    completions: mpsc::Sender<EffectCompletion>,
}

impl EffectScheduler {
    pub fn new(latency: Duration, completions: mpsc::Sender<EffectCompletion>) -> Self {
        Self {
            latency,
            next_ticket: 1,
            pending: BTreeMap::new(),
            completions,
        }
    }

    /// Starts `kind` for its view.
    ///
    /// Any effect already pending for the same view is aborted.
    pub fn schedule(&mut self, kind: EffectKind) -> Ticket {
        let ticket = Ticket::new(self.next_ticket);
        self.next_ticket += 1;

        let view = kind.view();
        if let Some(previous) = self.pending.remove(&view) {
            previous.task.abort();
            debug!(
                "Superseded effect {:?} {} for {} with {}",
                previous.kind, previous.ticket, view, ticket
            );
        }

        let latency = self.latency;
        let completions = self.completions.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            if completions
                .send(EffectCompletion { kind, ticket })
                .await
                .is_err()
            {
                debug!("Effect {ticket} completed after its owner shut down");
            }
        });

        info!("Scheduled {kind:?} {ticket} for {view}");
        self.pending.insert(view, PendingEffect { kind, ticket, task });
        ticket
    }

    /// Claims `completion` if its ticket is still current for its view.
    ///
    /// Returns `false` for superseded or cancelled tickets.
    pub fn take_if_current(&mut self, completion: &EffectCompletion) -> bool {
        let view = completion.kind.view();
        match self.pending.get(&view) {
            Some(pending) if pending.ticket == completion.ticket => {
                self.pending.remove(&view);
                true
            }
            _ => {
                debug!(
                    "Ignoring stale completion {:?} {}",
                    completion.kind, completion.ticket
                );
                false
            }
        }
    }

    /// Aborts the pending effect of `view`, returning its kind.
    pub fn cancel(&mut self, view: ViewKey) -> Option<EffectKind> {
        let pending = self.pending.remove(&view)?;
        pending.task.abort();
        info!("Cancelled {:?} {} for {view}", pending.kind, pending.ticket);
        Some(pending.kind)
    }

    /// Aborts everything, returning the kinds in view order.
    pub fn cancel_all(&mut self) -> Vec<EffectKind> {
        let views: Vec<ViewKey> = self.pending.keys().copied().collect();
        views
            .into_iter()
            .filter_map(|view| self.cancel(view))
            .collect()
    }

    pub fn pending_ticket(&self, view: ViewKey) -> Option<Ticket> {
        self.pending.get(&view).map(|pending| pending.ticket)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl Drop for EffectScheduler {
    fn drop(&mut self) {
        for pending in self.pending.values() {
            pending.task.abort();
        }
    }
}
