//! Undo ledger: bounded history of reversible destructive operations.
//!
//! Destructive operations (delete, bulk edit, stash clear) snapshot the
//! entries they affect into an [`UndoRecord`]. Payloads are stored as raw
//! JSON and decoded only on restore, so one corrupt record never prevents
//! the tracker from loading or other records from being restored.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use thiserror::Error;

use crate::entry::Entry;
use crate::error::TrackerError;
use crate::stash::Stash;
use crate::tracker::Tracker;
use crate::types::{EntryId, UndoId, ValidationError};

/// Maximum number of undo records kept; older records are evicted first.
pub const MAX_UNDO_HISTORY: usize = 10;

/// The kind of operation an undo record reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoOperation {
    Delete,
    BulkEdit,
    Clear,
}

/// Entries removed by a delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeletePayload {
    pub entries: Vec<Entry>,
}

/// Entries as they were before a bulk edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkEditPayload {
    pub original_entries: Vec<Entry>,
}

/// Stashed entries and the stash removed by a stash clear.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClearPayload {
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub stashes: Vec<Stash>,
}

/// A decoded undo snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoPayload {
    Delete(DeletePayload),
    BulkEdit(BulkEditPayload),
    Clear(ClearPayload),
}

impl UndoPayload {
    pub const fn operation(&self) -> UndoOperation {
        match self {
            Self::Delete(_) => UndoOperation::Delete,
            Self::BulkEdit(_) => UndoOperation::BulkEdit,
            Self::Clear(_) => UndoOperation::Clear,
        }
    }

    fn to_raw(&self) -> Result<Box<RawValue>, serde_json::Error> {
        match self {
            Self::Delete(payload) => serde_json::value::to_raw_value(payload),
            Self::BulkEdit(payload) => serde_json::value::to_raw_value(payload),
            Self::Clear(payload) => serde_json::value::to_raw_value(payload),
        }
    }
}

/// One reversible operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoRecord {
    pub id: UndoId,
    pub operation: UndoOperation,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    payload: Box<RawValue>,
}

impl UndoRecord {
    /// Creates a record with a fresh ID.
    pub fn new(
        payload: &UndoPayload,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, TrackerError> {
        let id = UndoId::generate();
        let raw = payload
            .to_raw()
            .map_err(|source| TrackerError::MalformedPayload {
                record: id.clone(),
                source,
            })?;
        Ok(Self {
            id,
            operation: payload.operation(),
            description: description.into(),
            timestamp,
            payload: raw,
        })
    }

    /// Decodes the snapshot according to the record's operation.
    pub fn payload(&self) -> Result<UndoPayload, TrackerError> {
        let raw = self.payload.get();
        let decoded = match self.operation {
            UndoOperation::Delete => serde_json::from_str(raw).map(UndoPayload::Delete),
            UndoOperation::BulkEdit => serde_json::from_str(raw).map(UndoPayload::BulkEdit),
            UndoOperation::Clear => serde_json::from_str(raw).map(UndoPayload::Clear),
        };
        decoded.map_err(|source| TrackerError::MalformedPayload {
            record: self.id.clone(),
            source,
        })
    }
}

/// Outcome of restoring one undo record.
#[derive(Debug, Clone)]
pub struct RestoreReport {
    pub record: UndoId,
    pub operation: UndoOperation,
    pub description: String,

    /// Restored entries with their short IDs after the restore.
    pub restored: Vec<Entry>,

    /// Bulk-edited entries that no longer exist and were not restored.
    pub missing: Vec<EntryId>,
}

/// A batch restore stopped at a failing record.
///
/// Records restored before the failure stay restored.
#[derive(Debug, Error)]
#[error("undo stopped at record {failed} after restoring {count}", count = .restored.len())]
pub struct BatchRestoreError {
    pub restored: Vec<RestoreReport>,
    pub failed: UndoId,
    #[source]
    pub source: TrackerError,
}

impl Tracker {
    /// Appends an undo record, evicting the oldest beyond [`MAX_UNDO_HISTORY`].
    pub(crate) fn record_undo(
        &mut self,
        payload: &UndoPayload,
        description: String,
        now: DateTime<Utc>,
    ) -> Result<UndoId, TrackerError> {
        let record = UndoRecord::new(payload, description, now)?;
        let id = record.id.clone();
        tracing::debug!(record = %id, operation = ?record.operation, "recorded undo");
        self.undo_history.push(record);

        while self.undo_history.len() > MAX_UNDO_HISTORY {
            let evicted = self.undo_history.remove(0);
            tracing::debug!(record = %evicted.id, "evicted oldest undo record");
        }
        Ok(id)
    }

    /// Finds an undo record by reference.
    ///
    /// `N` or `#N` is the N-th most recent record (1-based). Anything else,
    /// or a bare `N` beyond the history, is matched as a unique prefix of a
    /// record ID.
    pub fn find_undo(&self, reference: &str) -> Result<UndoId, TrackerError> {
        let reference = reference.trim();
        let bare = reference.strip_prefix('#').unwrap_or(reference);
        if bare.is_empty() {
            return Err(ValidationError::Empty {
                field: "undo reference",
            }
            .into());
        }

        let positional = bare
            .parse::<usize>()
            .ok()
            .and_then(|position| position.checked_sub(1))
            .and_then(|index| self.undo_history.iter().rev().nth(index));
        if let Some(record) = positional {
            return Ok(record.id.clone());
        }
        if reference.starts_with('#') {
            return Err(TrackerError::UndoNotFound(reference.to_string()));
        }

        let matches: Vec<&UndoRecord> = self
            .undo_history
            .iter()
            .filter(|record| record.id.as_str().starts_with(bare))
            .collect();
        match matches.as_slice() {
            [] => Err(TrackerError::UndoNotFound(reference.to_string())),
            [record] => Ok(record.id.clone()),
            _ => Err(TrackerError::UndoAmbiguous(reference.to_string())),
        }
    }

    /// Reverses one recorded operation and removes its record.
    ///
    /// Deleted and cleared entries are appended and the store renumbered;
    /// bulk-edited entries are overwritten in place by ID.
    pub fn restore(&mut self, id: &UndoId, now: DateTime<Utc>) -> Result<RestoreReport, TrackerError> {
        let index = self
            .undo_history
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| TrackerError::UndoNotFound(id.to_string()))?;
        let record = &self.undo_history[index];
        let payload = record.payload()?;
        let mut report = RestoreReport {
            record: record.id.clone(),
            operation: record.operation,
            description: record.description.clone(),
            restored: Vec::new(),
            missing: Vec::new(),
        };

        match payload {
            UndoPayload::Delete(payload) => {
                report.restored = self.reinsert(id, payload.entries, None, now)?;
            }
            UndoPayload::Clear(payload) => {
                let fallback = payload.stashes.into_iter().next();
                report.restored = self.reinsert(id, payload.entries, fallback, now)?;
            }
            UndoPayload::BulkEdit(payload) => {
                let (restored, missing) = self.overwrite(payload.original_entries, now)?;
                report.restored = restored;
                report.missing = missing;
            }
        }

        self.undo_history.remove(index);
        tracing::info!(
            record = %report.record,
            restored = report.restored.len(),
            missing = report.missing.len(),
            "restored undo record"
        );
        Ok(report)
    }

    /// Restores several records in order, stopping at the first failure.
    pub fn restore_many(
        &mut self,
        ids: &[UndoId],
        now: DateTime<Utc>,
    ) -> Result<Vec<RestoreReport>, BatchRestoreError> {
        let mut restored = Vec::new();
        for id in ids {
            match self.restore(id, now) {
                Ok(report) => restored.push(report),
                Err(source) => {
                    return Err(BatchRestoreError {
                        restored,
                        failed: id.clone(),
                        source,
                    });
                }
            }
        }
        Ok(restored)
    }

    /// Appends snapshot entries after checking they fit the current store.
    fn reinsert(
        &mut self,
        record: &UndoId,
        mut entries: Vec<Entry>,
        fallback: Option<Stash>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Entry>, TrackerError> {
        let mut ids = HashSet::new();
        let mut running = HashSet::new();
        for entry in &entries {
            if !ids.insert(&entry.id) || self.entry(&entry.id).is_some() {
                return Err(TrackerError::DuplicateEntry {
                    record: record.clone(),
                    entry: entry.id.clone(),
                });
            }
            if entry.active
                && (!running.insert(&entry.keyword) || self.has_active_for_keyword(&entry.keyword))
            {
                return Err(TrackerError::KeywordActive {
                    keyword: entry.keyword.clone(),
                });
            }
        }

        for entry in &mut entries {
            if entry.active {
                entry.stashed = false;
            }
        }
        let restored_ids: Vec<EntryId> = entries.iter().map(|e| e.id.clone()).collect();
        self.entries.append(&mut entries);
        self.reconcile_stash(fallback, now);
        self.renumber_short_ids();

        Ok(restored_ids
            .iter()
            .filter_map(|id| self.entry(id).cloned())
            .collect())
    }

    /// Overwrites entries by ID, keeping their current short IDs.
    fn overwrite(
        &mut self,
        originals: Vec<Entry>,
        now: DateTime<Utc>,
    ) -> Result<(Vec<Entry>, Vec<EntryId>), TrackerError> {
        let mut entries = self.entries.clone();
        let mut restored = Vec::new();
        let mut missing = Vec::new();
        for mut original in originals {
            match entries.iter_mut().find(|entry| entry.id == original.id) {
                Some(slot) => {
                    original.short_id = slot.short_id;
                    *slot = original;
                    restored.push(slot.clone());
                }
                None => missing.push(original.id),
            }
        }

        let mut running = HashSet::new();
        for entry in entries.iter().filter(|entry| entry.active) {
            if !running.insert(entry.keyword.as_str()) {
                return Err(TrackerError::KeywordActive {
                    keyword: entry.keyword.clone(),
                });
            }
        }

        self.entries = entries;
        self.reconcile_stash(None, now);
        Ok((restored, missing))
    }
}
