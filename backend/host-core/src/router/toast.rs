//! Short-lived notifications raised by transitions.
//!
//! Expiry is evaluated lazily against an `Instant` supplied by the caller, so
//! nothing here owns a timer.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

pub const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// What a transition asks to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastRequest {
    pub level: ToastLevel,
    pub message: String,
}

impl ToastRequest {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
    pub expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct ToastQueue {
    ttl: Duration,
    next_id: u64,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 1,
            toasts: Vec::new(),
        }
    }

    pub fn push(&mut self, request: ToastRequest, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            level: request.level,
            message: request.message,
            expires_at: now + self.ttl,
        });
        id
    }

    /// Drops expired toasts and returns the rest, oldest first.
    pub fn active(&mut self, now: Instant) -> &[Toast] {
        self.toasts.retain(|toast| toast.expires_at > now);
        &self.toasts
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}
