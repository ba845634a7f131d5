//! The tracker aggregate: entries, the stash, and undo history.
//!
//! A [`Tracker`] is loaded whole, mutated by exactly one operation, and saved
//! whole. Operations live in sibling modules as `impl Tracker` blocks:
//!
//! - [`crate::lifecycle`]: start, stop, continue, add, delete
//! - [`crate::edit`]: bulk edits and tag maintenance
//! - [`crate::stash`]: stash, apply, clear, pop
//! - [`crate::undo`]: recording and restoring snapshots
//!
//! Every operation validates before it mutates, so an `Err` means the
//! tracker is exactly as it was.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::short_id;
use crate::stash::Stash;
use crate::types::EntryId;
use crate::undo::UndoRecord;

/// All persisted time-tracking state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tracker {
    #[serde(default)]
    pub(crate) entries: Vec<Entry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) stash: Option<Stash>,

    #[serde(default)]
    pub(crate) undo_history: Vec<UndoRecord>,
}

impl Tracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The pending stash, if any.
    pub const fn stash(&self) -> Option<&Stash> {
        self.stash.as_ref()
    }

    /// Undo records, oldest first.
    pub fn undo_history(&self) -> &[UndoRecord] {
        &self.undo_history
    }

    /// Finds an entry by its permanent ID.
    pub fn entry(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// Finds an entry by its current short ID.
    pub fn entry_by_short_id(&self, short_id: u32) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.short_id == short_id)
    }

    /// Running entries.
    pub fn active_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|entry| entry.active)
    }

    /// Entries paused in the stash.
    pub fn stashed_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|entry| entry.stashed)
    }

    /// Whether any entry for `keyword` is running.
    pub fn has_active_for_keyword(&self, keyword: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.active && entry.keyword == keyword)
    }

    /// The most recently started running entry for `keyword`.
    pub fn latest_active_for_keyword(&self, keyword: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .filter(|entry| entry.active && entry.keyword == keyword)
            .max_by_key(|entry| entry.start_time)
    }

    /// The most recently started non-stashed entry for `keyword`.
    pub fn latest_unstashed_for_keyword(&self, keyword: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .filter(|entry| !entry.stashed && entry.keyword == keyword)
            .max_by_key(|entry| entry.start_time)
    }

    /// The most recently started stopped, non-stashed entry.
    pub fn last_resumable(&self) -> Option<&Entry> {
        self.entries
            .iter()
            .filter(|entry| entry.is_resumable())
            .max_by_key(|entry| entry.start_time)
    }

    /// Repairs state from an older or hand-edited document.
    ///
    /// Clears the stashed flag on running entries, reconciles the stash with
    /// the stashed entries, and renumbers short IDs.
    pub fn normalize(&mut self, now: DateTime<Utc>) {
        for entry in &mut self.entries {
            if entry.active && entry.stashed {
                tracing::warn!(entry = %entry.id, "running entry was marked stashed, unstashing");
                entry.stashed = false;
            }
        }
        self.reconcile_stash(None, now);
        self.renumber_short_ids();
    }

    /// Reassigns short IDs densely from 1 in insertion order.
    pub fn renumber_short_ids(&mut self) {
        short_id::renumber(&mut self.entries);
    }

    pub(crate) fn entry_mut(&mut self, id: &EntryId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| &entry.id == id)
    }

    /// Appends a new running entry with the next free short ID.
    pub(crate) fn push_active(
        &mut self,
        keyword: &str,
        tags: Vec<String>,
        start_time: DateTime<Utc>,
    ) -> Entry {
        let short_id = short_id::next_available(&self.entries);
        let entry = Entry::new_active(keyword, tags, short_id, start_time);
        tracing::debug!(
            entry = %entry.id,
            short_id,
            keyword,
            "created running entry"
        );
        self.entries.push(entry.clone());
        entry
    }

    /// Removes entries by ID, drops them from the stash, and renumbers.
    ///
    /// Returns the removed entries as they were, in store order.
    pub(crate) fn remove_entries(&mut self, ids: &HashSet<EntryId>) -> Vec<Entry> {
        let (removed, kept): (Vec<Entry>, Vec<Entry>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| ids.contains(&entry.id));
        self.entries = kept;

        if let Some(stash) = &mut self.stash {
            stash.entry_ids.retain(|id| !ids.contains(id));
            if stash.entry_ids.is_empty() {
                tracing::debug!(stash = %stash.id, "stash emptied by removal, discarding");
                self.stash = None;
            }
        }

        self.renumber_short_ids();
        removed
    }

    /// Makes the stash reference exactly the stashed entries.
    ///
    /// When stashed entries exist but no stash does, `fallback` is reinstated
    /// (or a new stash created). An empty stash is discarded.
    pub(crate) fn reconcile_stash(&mut self, fallback: Option<Stash>, now: DateTime<Utc>) {
        let stashed: Vec<EntryId> = self.stashed_entries().map(|e| e.id.clone()).collect();
        if stashed.is_empty() {
            self.stash = None;
            return;
        }

        let stash = self
            .stash
            .get_or_insert_with(|| fallback.unwrap_or_else(|| Stash::new(Vec::new(), now)));
        stash.entry_ids.retain(|id| stashed.contains(id));
        for id in stashed {
            if !stash.entry_ids.contains(&id) {
                stash.entry_ids.push(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn new_tracker_is_empty() {
        let tracker = Tracker::new();
        assert!(tracker.entries().is_empty());
        assert!(tracker.stash().is_none());
        assert!(tracker.undo_history().is_empty());
    }

    #[test]
    fn empty_document_deserializes() {
        let tracker: Tracker = serde_json::from_str("{}").unwrap();
        assert!(tracker.entries().is_empty());
    }

    #[test]
    fn latest_queries_use_start_time_not_position() {
        let mut tracker = Tracker::new();
        let late = tracker.push_active("coding", Vec::new(), t0() + Duration::hours(2));
        let early = tracker.push_active("coding", Vec::new(), t0());
        tracker.entry_mut(&early.id).unwrap().stop(t0() + Duration::hours(1));

        assert_eq!(
            tracker.latest_unstashed_for_keyword("coding").unwrap().id,
            late.id
        );
        assert_eq!(tracker.last_resumable().unwrap().id, early.id);
        assert_eq!(
            tracker.latest_active_for_keyword("coding").unwrap().id,
            late.id
        );
    }

    #[test]
    fn remove_entries_renumbers_and_prunes_stash() {
        let mut tracker = Tracker::new();
        let a = tracker.push_active("a", Vec::new(), t0());
        let b = tracker.push_active("b", Vec::new(), t0());
        let c = tracker.push_active("c", Vec::new(), t0());
        for id in [&a.id, &b.id] {
            let entry = tracker.entry_mut(id).unwrap();
            entry.stop(t0());
            entry.stashed = true;
        }
        tracker.stash = Some(Stash::new(vec![a.id.clone(), b.id.clone()], t0()));

        let removed = tracker.remove_entries(&HashSet::from([a.id.clone(), b.id.clone()]));

        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].short_id, 1);
        assert!(tracker.stash().is_none());
        assert_eq!(tracker.entries().len(), 1);
        assert_eq!(tracker.entry(&c.id).unwrap().short_id, 1);
    }

    #[test]
    fn normalize_repairs_inconsistent_documents() {
        let mut tracker = Tracker::new();
        let running = tracker.push_active("a", Vec::new(), t0());
        let orphan = tracker.push_active("b", Vec::new(), t0());
        tracker.entry_mut(&running.id).unwrap().stashed = true;
        {
            let entry = tracker.entry_mut(&orphan.id).unwrap();
            entry.stop(t0());
            entry.stashed = true;
        }
        tracker.entries[0].short_id = 9;

        tracker.normalize(t0());

        assert!(!tracker.entry(&running.id).unwrap().stashed);
        let stash = tracker.stash().unwrap();
        assert_eq!(stash.entry_ids, vec![orphan.id.clone()]);
        let ids: Vec<u32> = tracker.entries().iter().map(|e| e.short_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
