//! Read-only summaries of which tags and keywords are in use.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::entry::Entry;
use crate::tracker::Tracker;

/// Entries grouped under one tag or keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    pub name: String,

    /// Matching entries in short-ID order.
    pub entries: Vec<Entry>,
}

impl Usage {
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Summed duration, live for running entries.
    pub fn total_duration(&self, now: DateTime<Utc>) -> i64 {
        self.entries
            .iter()
            .map(|entry| entry.current_duration(now))
            .sum()
    }
}

fn collect(groups: BTreeMap<String, Vec<Entry>>) -> Vec<Usage> {
    groups
        .into_iter()
        .map(|(name, mut entries)| {
            entries.sort_by_key(|entry| entry.short_id);
            Usage { name, entries }
        })
        .collect()
}

impl Tracker {
    /// Every tag in use, sorted by name.
    ///
    /// An entry repeating a tag is counted once for it.
    pub fn tag_usage(&self) -> Vec<Usage> {
        let mut groups: BTreeMap<String, Vec<Entry>> = BTreeMap::new();
        for entry in &self.entries {
            let mut tags: Vec<&String> = entry.tags.iter().collect();
            tags.sort();
            tags.dedup();
            for tag in tags {
                groups.entry(tag.clone()).or_default().push(entry.clone());
            }
        }
        collect(groups)
    }

    /// Every keyword of a non-stashed entry, sorted by name.
    pub fn keyword_usage(&self) -> Vec<Usage> {
        let mut groups: BTreeMap<String, Vec<Entry>> = BTreeMap::new();
        for entry in self.entries.iter().filter(|entry| !entry.stashed) {
            groups
                .entry(entry.keyword.clone())
                .or_default()
                .push(entry.clone());
        }
        collect(groups)
    }
}
