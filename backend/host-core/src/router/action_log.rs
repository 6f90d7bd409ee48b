//! Bounded, in-memory history of received actions.

use std::collections::VecDeque;
use std::time::SystemTime;

use models::Action;
use serde::Serialize;

/// Default number of entries kept.
pub const DEFAULT_ACTION_LOG_CAPACITY: usize = 50;

const PREVIEW_LIMIT: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionLogEntry {
    pub sequence_id: u64,
    pub timestamp: SystemTime,
    pub action: Action,
}

impl ActionLogEntry {
    /// Short, human-readable summary of the action's payload.
    ///
    /// Truncated to a fixed number of characters with a trailing `…`.
    pub fn preview(&self) -> String {
        let full = match &self.action {
            Action::Tool { tool_name, params } => {
                let params = serde_json::to_string(params).unwrap_or_default();
                format!("{tool_name} {params}")
            }
            Action::Prompt { prompt } => prompt.clone(),
            Action::Link { url } => url.to_string(),
        };

        if full.chars().count() <= PREVIEW_LIMIT {
            return full;
        }

        let mut truncated: String = full.chars().take(PREVIEW_LIMIT).collect();
        truncated.push('…');
        truncated
    }
}

/// Ring buffer of [`ActionLogEntry`]; oldest entries are evicted first.
///
/// Sequence ids start at 1 and keep increasing across evictions.
#[derive(Debug, Clone)]
pub struct ActionLog {
    capacity: usize,
    entries: VecDeque<ActionLogEntry>,
    next_sequence_id: u64,
}

impl ActionLog {
    /// `capacity` is clamped to at least one entry.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            next_sequence_id: 1,
        }
    }

    /// Appends `action` and returns its sequence id.
    pub fn append(&mut self, action: Action, timestamp: SystemTime) -> u64 {
        let sequence_id = self.next_sequence_id;
        self.next_sequence_id += 1;

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ActionLogEntry {
            sequence_id,
            timestamp,
            action,
        });

        sequence_id
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter().rev()
    }

    /// Owned copy of [`entries`](Self::entries) for snapshots.
    pub fn snapshot(&self) -> Vec<ActionLogEntry> {
        self.entries().cloned().collect()
    }

    pub fn latest(&self) -> Option<&ActionLogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(DEFAULT_ACTION_LOG_CAPACITY)
    }
}
