//! Bulk field edits and tag maintenance, all reversible through undo.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::entry::{Entry, seconds_between};
use crate::error::TrackerError;
use crate::tracker::Tracker;
use crate::types::{EntryId, ValidationError, validate_keyword};
use crate::undo::{BulkEditPayload, UndoPayload};

/// A field assignment applied to every selected entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Keyword(String),
    Tags(Vec<String>),
    /// Whole seconds; the end time moves to `start + duration`.
    Duration(i64),
    /// The end time stays; the duration is recomputed.
    StartTime(DateTime<Utc>),
}

impl FieldEdit {
    /// Field name used in undo descriptions.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Keyword(_) => "keyword",
            Self::Tags(_) => "tags",
            Self::Duration(_) => "duration",
            Self::StartTime(_) => "starttime",
        }
    }

    fn validate(&self, targets: &[&Entry], now: DateTime<Utc>) -> Result<(), ValidationError> {
        match self {
            Self::Keyword(keyword) => validate_keyword(keyword),
            Self::Tags(tags) => {
                if tags.iter().any(|tag| tag.trim().is_empty()) {
                    return Err(ValidationError::Empty { field: "tag" });
                }
                Ok(())
            }
            Self::Duration(seconds) if *seconds < 0 => Err(ValidationError::NegativeDuration {
                field: "duration",
                seconds: *seconds,
            }),
            Self::Duration(seconds) => {
                if targets
                    .iter()
                    .any(|entry| end_after(entry.start_time, *seconds).is_none())
                {
                    return Err(ValidationError::OutOfRange { field: "duration" });
                }
                Ok(())
            }
            Self::StartTime(start) => {
                let ends_before = targets
                    .iter()
                    .any(|entry| entry.end_time.unwrap_or(now) < *start);
                if ends_before {
                    return Err(ValidationError::EndBeforeStart);
                }
                Ok(())
            }
        }
    }

    fn apply(&self, entry: &mut Entry) {
        match self {
            Self::Keyword(keyword) => entry.keyword.clone_from(keyword),
            Self::Tags(tags) => entry.tags.clone_from(tags),
            Self::Duration(seconds) => {
                if let Some(end) = end_after(entry.start_time, *seconds) {
                    entry.end_time = Some(end);
                    entry.duration = *seconds;
                }
            }
            Self::StartTime(start) => {
                entry.start_time = *start;
                if let Some(end) = entry.end_time {
                    entry.duration = seconds_between(*start, end);
                }
            }
        }
    }
}

/// `start + seconds`, or `None` outside the representable time range.
fn end_after(start: DateTime<Utc>, seconds: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(seconds).and_then(|offset| start.checked_add_signed(offset))
}

impl fmt::Display for FieldEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(keyword) => write!(f, "keyword = {keyword}"),
            Self::Tags(tags) => write!(f, "tags = [{}]", tags.join(", ")),
            Self::Duration(seconds) => write!(f, "duration = {seconds}s"),
            Self::StartTime(start) => write!(f, "starttime = {}", start.to_rfc3339()),
        }
    }
}

impl Tracker {
    /// Applies `edit` to every entry in `ids`, stopping running ones first.
    ///
    /// Records an undo snapshot of the entries as they were.
    pub fn bulk_edit(
        &mut self,
        ids: &[EntryId],
        edit: &FieldEdit,
        now: DateTime<Utc>,
    ) -> Result<Vec<Entry>, TrackerError> {
        if ids.is_empty() {
            return Err(ValidationError::Empty {
                field: "entry selection",
            }
            .into());
        }
        let mut targets = Vec::with_capacity(ids.len());
        for id in ids {
            targets.push(
                self.entry(id)
                    .ok_or_else(|| TrackerError::EntryNotFound(id.clone()))?,
            );
        }
        edit.validate(&targets, now)?;

        let snapshot: Vec<Entry> = targets.into_iter().cloned().collect();
        let description = format!(
            "Bulk edited {} entries (field: {})",
            snapshot.len(),
            edit.field()
        );
        let edited = self.edit_entries(snapshot, description, now, |entry| {
            entry.stop(now);
            edit.apply(entry);
        })?;
        tracing::info!(count = edited.len(), %edit, "bulk edited entries");
        Ok(edited)
    }

    /// Renames a tag on every entry carrying it.
    pub fn rename_tag(
        &mut self,
        old: &str,
        new: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Entry>, TrackerError> {
        if old.trim().is_empty() || new.trim().is_empty() {
            return Err(ValidationError::Empty { field: "tag" }.into());
        }
        if old == new {
            return Err(ValidationError::Unchanged {
                field: "tag",
                value: old.to_string(),
            }
            .into());
        }

        let snapshot = self.entries_with_tag(old)?;
        let description = format!(
            "Renamed tag '{old}' to '{new}' on {} entries",
            snapshot.len()
        );
        self.edit_entries(snapshot, description, now, |entry| {
            for tag in entry.tags.iter_mut().filter(|tag| tag.as_str() == old) {
                *tag = new.to_string();
            }
        })
    }

    /// Removes a tag from every entry carrying it, optionally only from
    /// entries for `keyword`.
    pub fn remove_tag(
        &mut self,
        tag: &str,
        keyword: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Entry>, TrackerError> {
        if tag.trim().is_empty() {
            return Err(ValidationError::Empty { field: "tag" }.into());
        }

        let (snapshot, description) = match keyword {
            None => {
                let snapshot = self.entries_with_tag(tag)?;
                let description = format!("Removed tag '{tag}' from {} entries", snapshot.len());
                (snapshot, description)
            }
            Some(keyword) => {
                let snapshot: Vec<Entry> = self
                    .entries
                    .iter()
                    .filter(|entry| entry.keyword == keyword && entry.has_tag(tag))
                    .cloned()
                    .collect();
                if snapshot.is_empty() {
                    return Err(TrackerError::TagNotFoundForKeyword {
                        tag: tag.to_string(),
                        keyword: keyword.to_string(),
                    });
                }
                let description = format!(
                    "Removed tag '{tag}' from {} '{keyword}' entries",
                    snapshot.len()
                );
                (snapshot, description)
            }
        };
        self.edit_entries(snapshot, description, now, |entry| {
            entry.tags.retain(|t| t != tag);
        })
    }

    fn entries_with_tag(&self, tag: &str) -> Result<Vec<Entry>, TrackerError> {
        let matched: Vec<Entry> = self
            .entries
            .iter()
            .filter(|entry| entry.has_tag(tag))
            .cloned()
            .collect();
        if matched.is_empty() {
            return Err(TrackerError::TagNotFound(tag.to_string()));
        }
        Ok(matched)
    }

    /// Records `snapshot` as a bulk-edit undo, then applies `change` to each
    /// snapshotted entry.
    fn edit_entries(
        &mut self,
        snapshot: Vec<Entry>,
        description: String,
        now: DateTime<Utc>,
        change: impl Fn(&mut Entry),
    ) -> Result<Vec<Entry>, TrackerError> {
        let ids: HashSet<EntryId> = snapshot.iter().map(|e| e.id.clone()).collect();
        self.record_undo(
            &UndoPayload::BulkEdit(BulkEditPayload {
                original_entries: snapshot,
            }),
            description,
            now,
        )?;

        let mut edited = Vec::with_capacity(ids.len());
        for entry in self.entries.iter_mut().filter(|e| ids.contains(&e.id)) {
            change(entry);
            edited.push(entry.clone());
        }
        Ok(edited)
    }
}
