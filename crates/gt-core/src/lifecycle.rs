//! Entry lifecycle: start, stop, continue, add, and delete.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::entry::Entry;
use crate::error::TrackerError;
use crate::short_id;
use crate::tracker::Tracker;
use crate::types::{EntryId, ValidationError, validate_keyword};
use crate::undo::{DeletePayload, UndoPayload};

/// Resolves an optional backdate into a start time.
pub(crate) fn backdated(
    now: DateTime<Utc>,
    backdate: Option<Duration>,
) -> Result<DateTime<Utc>, ValidationError> {
    match backdate {
        None => Ok(now),
        Some(offset) if offset < Duration::zero() => Err(ValidationError::NegativeDuration {
            field: "backdate",
            seconds: offset.num_seconds(),
        }),
        Some(offset) => now
            .checked_sub_signed(offset)
            .ok_or(ValidationError::OutOfRange { field: "backdate" }),
    }
}

impl Tracker {
    /// Starts a new running entry for `keyword`.
    ///
    /// With `backdate`, the entry is recorded as having started that long
    /// before `now`.
    pub fn start(
        &mut self,
        keyword: &str,
        tags: Vec<String>,
        backdate: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<Entry, TrackerError> {
        if self.has_active_for_keyword(keyword) {
            return Err(TrackerError::KeywordActive {
                keyword: keyword.to_string(),
            });
        }
        validate_keyword(keyword)?;
        let start_time = backdated(now, backdate)?;

        Ok(self.push_active(keyword, tags, start_time))
    }

    /// Stops a running entry.
    pub fn stop(&mut self, id: &EntryId, now: DateTime<Utc>) -> Result<Entry, TrackerError> {
        let entry = self
            .entry_mut(id)
            .ok_or_else(|| TrackerError::EntryNotFound(id.clone()))?;
        if !entry.stop(now) {
            return Err(TrackerError::NotRunning {
                short_id: entry.short_id,
            });
        }
        tracing::debug!(entry = %entry.id, duration = entry.duration, "stopped entry");
        Ok(entry.clone())
    }

    /// Stops every running entry, returning them in store order.
    pub fn stop_all(&mut self, now: DateTime<Utc>) -> Vec<Entry> {
        self.entries
            .iter_mut()
            .filter_map(|entry| entry.stop(now).then(|| entry.clone()))
            .collect()
    }

    /// Starts a new running entry with the keyword and tags of `source`.
    ///
    /// The source entry itself is left untouched.
    pub fn continue_from(
        &mut self,
        source: &EntryId,
        now: DateTime<Utc>,
    ) -> Result<Entry, TrackerError> {
        let source = self
            .entry(source)
            .ok_or_else(|| TrackerError::EntryNotFound(source.clone()))?;
        if source.active {
            return Err(TrackerError::AlreadyRunning {
                short_id: source.short_id,
            });
        }
        if source.stashed {
            return Err(TrackerError::EntryStashed {
                short_id: source.short_id,
            });
        }
        if self.has_active_for_keyword(&source.keyword) {
            return Err(TrackerError::KeywordActive {
                keyword: source.keyword.clone(),
            });
        }

        let keyword = source.keyword.clone();
        let tags = source.tags.clone();
        tracing::debug!(source = %source.id, "continuing entry");
        Ok(self.push_active(&keyword, tags, now))
    }

    /// Records a completed entry after the fact.
    pub fn add_completed(
        &mut self,
        keyword: &str,
        tags: Vec<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Entry, TrackerError> {
        validate_keyword(keyword)?;
        if end_time < start_time {
            return Err(ValidationError::EndBeforeStart.into());
        }

        let short_id = short_id::next_available(&self.entries);
        let entry = Entry::new_completed(keyword, tags, short_id, start_time, end_time);
        tracing::debug!(entry = %entry.id, duration = entry.duration, "added completed entry");
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Deletes entries and records an undo snapshot of them.
    ///
    /// Returns the removed entries with the short IDs they had before
    /// deletion; remaining entries are renumbered.
    pub fn delete(
        &mut self,
        ids: &[EntryId],
        now: DateTime<Utc>,
    ) -> Result<Vec<Entry>, TrackerError> {
        if ids.is_empty() {
            return Err(ValidationError::Empty {
                field: "entry selection",
            }
            .into());
        }
        if let Some(missing) = ids.iter().find(|id| self.entry(id).is_none()) {
            return Err(TrackerError::EntryNotFound(missing.clone()));
        }

        let targets: HashSet<EntryId> = ids.iter().cloned().collect();
        let snapshot: Vec<Entry> = self
            .entries
            .iter()
            .filter(|entry| targets.contains(&entry.id))
            .cloned()
            .collect();
        let description = describe_deletion(&snapshot);
        self.record_undo(
            &UndoPayload::Delete(DeletePayload {
                entries: snapshot,
            }),
            description,
            now,
        )?;

        let removed = self.remove_entries(&targets);
        tracing::info!(count = removed.len(), "deleted entries");
        Ok(removed)
    }
}

fn describe_deletion(entries: &[Entry]) -> String {
    match entries {
        [entry] => format!(
            "Deleted entry '{}' (ID: {})",
            entry.keyword, entry.short_id
        ),
        _ => format!("Deleted {} entries", entries.len()),
    }
}
