//! Time entries - one recorded or in-progress span for a keyword.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::EntryId;

/// A span of tracked time for a keyword.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    /// Permanent identifier.
    pub id: EntryId,

    /// Small dense number for CLI convenience; reassigned on removal.
    pub short_id: u32,

    /// Primary categorization.
    pub keyword: String,

    /// Secondary categorization.
    #[serde(default)]
    pub tags: Vec<String>,

    /// When tracking started.
    pub start_time: DateTime<Utc>,

    /// When tracking stopped (`None` while active).
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,

    /// Whole seconds, authoritative once stopped.
    #[serde(default)]
    pub duration: i64,

    /// Currently running.
    #[serde(default)]
    pub active: bool,

    /// Paused as part of the stash.
    #[serde(default)]
    pub stashed: bool,
}

impl Entry {
    /// Creates a running entry with a fresh ID.
    pub fn new_active(
        keyword: impl Into<String>,
        tags: Vec<String>,
        short_id: u32,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntryId::generate(),
            short_id,
            keyword: keyword.into(),
            tags,
            start_time,
            end_time: None,
            duration: 0,
            active: true,
            stashed: false,
        }
    }

    /// Creates a completed entry spanning `start_time..end_time`.
    pub fn new_completed(
        keyword: impl Into<String>,
        tags: Vec<String>,
        short_id: u32,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntryId::generate(),
            short_id,
            keyword: keyword.into(),
            tags,
            start_time,
            end_time: Some(end_time),
            duration: seconds_between(start_time, end_time),
            active: false,
            stashed: false,
        }
    }

    /// Stops a running entry at `now`.
    ///
    /// Returns `false` without touching the entry if it was not running.
    pub fn stop(&mut self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        self.end_time = Some(now);
        self.duration = seconds_between(self.start_time, now);
        self.active = false;
        true
    }

    /// Elapsed seconds, computed live for running entries.
    pub fn current_duration(&self, now: DateTime<Utc>) -> i64 {
        if self.active {
            seconds_between(self.start_time, now)
        } else {
            self.duration
        }
    }

    /// Whether the entry carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether the entry was stopped and can seed a `continue`.
    pub const fn is_resumable(&self) -> bool {
        !self.active && !self.stashed
    }

    /// Human-readable lifecycle state.
    pub const fn status(&self) -> &'static str {
        if self.active {
            "running"
        } else if self.stashed {
            "stashed"
        } else {
            "stopped"
        }
    }
}

/// Whole seconds from `start` to `end`, truncated and never negative.
pub(crate) fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_seconds().max(0)
}
