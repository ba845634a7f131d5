//! The stash: one bundle of paused work.
//!
//! Stashing stops every running entry and marks it stashed. The bundle can
//! later be applied (kept as plain stopped history), cleared (deleted, with
//! an undo record), or popped (each member resumes as a new running entry).

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::error::TrackerError;
use crate::lifecycle::backdated;
use crate::selector::Selector;
use crate::tracker::Tracker;
use crate::types::{EntryId, StashId};
use crate::undo::{ClearPayload, UndoPayload};

/// A set of stashed entries, referenced by ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stash {
    pub id: StashId,
    #[serde(default)]
    pub entry_ids: Vec<EntryId>,
    pub created_at: DateTime<Utc>,
}

impl Stash {
    /// Creates a stash with a fresh ID.
    pub fn new(entry_ids: Vec<EntryId>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: StashId::generate(),
            entry_ids,
            created_at,
        }
    }
}

/// Outcome of popping the stash.
#[derive(Debug, Clone, Default)]
pub struct PopReport {
    /// New running entries created from stashed ones.
    pub resumed: Vec<Entry>,

    /// Stashed entries left in place because their keyword was already running.
    pub skipped: Vec<Entry>,
}

impl Tracker {
    /// Stops every running entry and bundles them into a new stash.
    pub fn stash_active(&mut self, now: DateTime<Utc>) -> Result<Vec<Entry>, TrackerError> {
        if self.stash.is_some() {
            return Err(TrackerError::StashExists);
        }
        if self.active_entries().next().is_none() {
            return Err(TrackerError::NothingToStash);
        }

        let mut stashed = Vec::new();
        for entry in &mut self.entries {
            if entry.stop(now) {
                entry.stashed = true;
                stashed.push(entry.clone());
            }
        }

        let stash = Stash::new(stashed.iter().map(|e| e.id.clone()).collect(), now);
        tracing::info!(stash = %stash.id, count = stashed.len(), "stashed running entries");
        self.stash = Some(stash);
        Ok(stashed)
    }

    /// Releases stashed entries as plain stopped history and discards the stash.
    pub fn apply_stash(&mut self) -> Result<Vec<Entry>, TrackerError> {
        let stash = self.stash.take().ok_or(TrackerError::NoStash)?;

        let members: HashSet<&EntryId> = stash.entry_ids.iter().collect();
        let mut applied = Vec::new();
        for entry in &mut self.entries {
            if entry.stashed && members.contains(&entry.id) {
                entry.stashed = false;
                applied.push(entry.clone());
            }
        }

        tracing::info!(stash = %stash.id, count = applied.len(), "applied stash");
        Ok(applied)
    }

    /// Deletes the stashed entries and the stash, recording an undo snapshot.
    pub fn clear_stash(&mut self, now: DateTime<Utc>) -> Result<Vec<Entry>, TrackerError> {
        let stash = self.stash.clone().ok_or(TrackerError::NoStash)?;

        let targets: HashSet<EntryId> = self.stashed_entries().map(|e| e.id.clone()).collect();
        let snapshot: Vec<Entry> = self.stashed_entries().cloned().collect();
        let description = format!("Cleared stash with {} entries", snapshot.len());
        self.record_undo(
            &UndoPayload::Clear(ClearPayload {
                entries: snapshot,
                stashes: vec![stash],
            }),
            description,
            now,
        )?;

        let removed = self.remove_entries(&targets);
        self.stash = None;
        tracing::info!(count = removed.len(), "cleared stash");
        Ok(removed)
    }

    /// Resumes stashed entries as new running entries.
    ///
    /// An empty `selectors` slice pops every stashed entry. Each popped entry
    /// stays behind as stopped history; a member whose keyword is already
    /// running is skipped and stays stashed.
    pub fn pop_stash(
        &mut self,
        selectors: &[Selector],
        backdate: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<PopReport, TrackerError> {
        if self.stash.is_none() {
            return Err(TrackerError::NoStash);
        }
        let targets = self.pop_targets(selectors)?;
        let start_time = backdated(now, backdate)?;

        let mut report = PopReport::default();
        for id in targets {
            let Some(entry) = self.entry(&id).cloned() else {
                continue;
            };
            if self.has_active_for_keyword(&entry.keyword) {
                tracing::debug!(entry = %entry.id, keyword = %entry.keyword, "keyword running, skipping pop");
                report.skipped.push(entry);
                continue;
            }
            if let Some(stashed) = self.entry_mut(&id) {
                stashed.stashed = false;
            }
            let resumed = self.push_active(&entry.keyword, entry.tags.clone(), start_time);
            report.resumed.push(resumed);
        }

        self.reconcile_stash(None, now);
        tracing::info!(
            resumed = report.resumed.len(),
            skipped = report.skipped.len(),
            "popped stash"
        );
        Ok(report)
    }

    /// Stashed entries to pop, in store order, validated before any mutation.
    fn pop_targets(&self, selectors: &[Selector]) -> Result<Vec<EntryId>, TrackerError> {
        if selectors.is_empty() {
            return Ok(self.stashed_entries().map(|e| e.id.clone()).collect());
        }

        let mut wanted = HashSet::new();
        for selector in selectors {
            match selector {
                Selector::ShortId(short_id) => {
                    let entry = self
                        .entry_by_short_id(*short_id)
                        .ok_or(TrackerError::ShortIdNotFound(*short_id))?;
                    if !entry.stashed {
                        return Err(TrackerError::NotStashed(short_id.to_string()));
                    }
                    wanted.insert(entry.id.clone());
                }
                Selector::Keyword(keyword) => {
                    let matched: Vec<EntryId> = self
                        .stashed_entries()
                        .filter(|e| &e.keyword == keyword)
                        .map(|e| e.id.clone())
                        .collect();
                    if matched.is_empty() {
                        return Err(TrackerError::NotStashed(keyword.clone()));
                    }
                    wanted.extend(matched);
                }
            }
        }

        Ok(self
            .stashed_entries()
            .filter(|e| wanted.contains(&e.id))
            .map(|e| e.id.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    use crate::error::ErrorKind;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 8, 10, 0, 0).unwrap()
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn tracker_with_running(keywords: &[&str]) -> Tracker {
        let mut tracker = Tracker::new();
        for keyword in keywords {
            tracker
                .start(keyword, tags(&["t"]), None, t0())
                .unwrap();
        }
        tracker
    }

    fn assert_stash_consistent(tracker: &Tracker) {
        for entry in tracker.entries() {
            assert!(!(entry.active && entry.stashed), "running entry is stashed");
        }
        let stashed: Vec<&EntryId> = tracker.stashed_entries().map(|e| &e.id).collect();
        match tracker.stash() {
            Some(stash) => {
                assert!(!stashed.is_empty());
                assert_eq!(stash.entry_ids.iter().collect::<Vec<_>>(), stashed);
            }
            None => assert!(stashed.is_empty()),
        }
    }

    #[test]
    fn stash_stops_and_marks_running_entries() {
        let mut tracker = tracker_with_running(&["a", "b"]);
        let later = t0() + Duration::minutes(20);

        let stashed = tracker.stash_active(later).unwrap();

        assert_eq!(stashed.len(), 2);
        for entry in &stashed {
            assert!(entry.stashed);
            assert!(!entry.active);
            assert_eq!(entry.end_time, Some(later));
            assert_eq!(entry.duration, 20 * 60);
        }
        assert_eq!(tracker.stash().unwrap().created_at, later);
        assert_stash_consistent(&tracker);
    }

    #[test]
    fn second_stash_conflicts() {
        let mut tracker = tracker_with_running(&["a"]);
        tracker.stash_active(t0()).unwrap();
        tracker.start("b", Vec::new(), None, t0()).unwrap();

        let err = tracker.stash_active(t0()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(tracker.entry_by_short_id(2).unwrap().active);
    }

    #[test]
    fn stash_without_running_entries_is_not_found() {
        let mut tracker = Tracker::new();
        let err = tracker.stash_active(t0()).unwrap_err();
        assert!(matches!(err, TrackerError::NothingToStash));
        assert!(tracker.stash().is_none());
    }

    #[test]
    fn apply_keeps_times_and_discards_stash() {
        let mut tracker = tracker_with_running(&["a"]);
        let stashed = tracker.stash_active(t0() + Duration::minutes(5)).unwrap();

        let applied = tracker.apply_stash().unwrap();

        assert_eq!(applied.len(), 1);
        assert!(!applied[0].stashed);
        assert_eq!(applied[0].end_time, stashed[0].end_time);
        assert!(tracker.stash().is_none());
        assert!(matches!(tracker.apply_stash(), Err(TrackerError::NoStash)));
    }

    #[test]
    fn clear_deletes_members_and_records_undo() {
        let mut tracker = tracker_with_running(&["a", "b"]);
        tracker.stash_active(t0()).unwrap();
        tracker.start("c", Vec::new(), None, t0()).unwrap();

        let removed = tracker.clear_stash(t0()).unwrap();

        assert_eq!(removed.len(), 2);
        assert!(tracker.stash().is_none());
        assert_eq!(tracker.entries().len(), 1);
        assert_eq!(tracker.entries()[0].short_id, 1);
        let record = tracker.undo_history().last().unwrap();
        assert_eq!(record.description, "Cleared stash with 2 entries");
    }

    #[test]
    fn pop_round_trip() {
        let mut tracker = tracker_with_running(&["a", "b"]);
        let stashed_at = t0() + Duration::minutes(25);
        let stashed = tracker.stash_active(stashed_at).unwrap();
        let later = t0() + Duration::hours(1);

        let report = tracker.pop_stash(&[], None, later).unwrap();

        assert!(report.skipped.is_empty());
        assert_eq!(report.resumed.len(), 2);
        for (resumed, original) in report.resumed.iter().zip(&stashed) {
            assert_ne!(resumed.id, original.id);
            assert_ne!(resumed.short_id, original.short_id);
            assert_eq!(resumed.keyword, original.keyword);
            assert_eq!(resumed.tags, original.tags);
            assert_eq!(resumed.start_time, later);
            assert!(resumed.start_time >= stashed_at);
            assert!(resumed.end_time.is_none());
            assert!(resumed.active);

            let history = tracker.entry(&original.id).unwrap();
            let expected = Entry {
                stashed: false,
                ..original.clone()
            };
            assert_eq!(history, &expected);
        }
        assert_eq!(tracker.entries().len(), 4);
        assert!(tracker.stash().is_none());
        assert_stash_consistent(&tracker);
    }

    #[test]
    fn pop_skips_keywords_already_running() {
        let mut tracker = tracker_with_running(&["a", "b"]);
        tracker.stash_active(t0()).unwrap();
        tracker.start("a", Vec::new(), None, t0()).unwrap();

        let report = tracker.pop_stash(&[], None, t0()).unwrap();

        assert_eq!(report.resumed.len(), 1);
        assert_eq!(report.resumed[0].keyword, "b");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].keyword, "a");
        assert_eq!(tracker.stash().unwrap().entry_ids, vec![report.skipped[0].id.clone()]);
        assert_stash_consistent(&tracker);
    }

    #[test]
    fn pop_subset_by_keyword_with_backdate() {
        let mut tracker = tracker_with_running(&["a", "b"]);
        tracker.stash_active(t0()).unwrap();

        let report = tracker
            .pop_stash(
                &[Selector::Keyword("b".to_string())],
                Some(Duration::minutes(10)),
                t0() + Duration::hours(1),
            )
            .unwrap();

        assert_eq!(report.resumed.len(), 1);
        assert_eq!(
            report.resumed[0].start_time,
            t0() + Duration::hours(1) - Duration::minutes(10)
        );
        assert_eq!(tracker.stashed_entries().count(), 1);
        assert_stash_consistent(&tracker);
    }

    #[test]
    fn pop_validates_selectors_before_mutating() {
        let mut tracker = tracker_with_running(&["a"]);
        tracker.stash_active(t0()).unwrap();
        tracker.start("b", Vec::new(), None, t0()).unwrap();
        let before = tracker.entries().to_vec();

        let err = tracker
            .pop_stash(
                &[Selector::Keyword("a".to_string()), Selector::ShortId(2)],
                None,
                t0(),
            )
            .unwrap_err();
        assert!(matches!(err, TrackerError::NotStashed(_)));

        let err = tracker
            .pop_stash(&[Selector::Keyword("zzz".to_string())], None, t0())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = tracker
            .pop_stash(&[], Some(Duration::minutes(-1)), t0())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        assert_eq!(tracker.entries(), before.as_slice());
    }

    #[test]
    fn pop_without_stash_is_not_found() {
        let mut tracker = Tracker::new();
        assert!(matches!(
            tracker.pop_stash(&[], None, t0()),
            Err(TrackerError::NoStash)
        ));
    }
}
