//! Entry selectors: a short ID or a keyword, as typed on the command line.

use std::collections::HashSet;
use std::str::FromStr;

use crate::error::TrackerError;
use crate::short_id::MAX_SHORT_ID;
use crate::tracker::Tracker;
use crate::types::{EntryId, ValidationError};

/// A reference to one or more entries.
///
/// Integers in `1..=MAX_SHORT_ID` are short IDs; anything else is a keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    ShortId(u32),
    Keyword(String),
}

impl FromStr for Selector {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "selector" });
        }
        match s.parse::<u32>() {
            Ok(id) if (1..=MAX_SHORT_ID).contains(&id) => Ok(Self::ShortId(id)),
            _ => Ok(Self::Keyword(s.to_string())),
        }
    }
}

impl Tracker {
    /// Resolves selectors to entry IDs in selector order, without duplicates.
    ///
    /// A keyword selects every entry with that keyword.
    pub fn select_ids(&self, selectors: &[Selector]) -> Result<Vec<EntryId>, TrackerError> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for selector in selectors {
            let matched: Vec<EntryId> = match selector {
                Selector::ShortId(short_id) => {
                    let entry = self
                        .entry_by_short_id(*short_id)
                        .ok_or(TrackerError::ShortIdNotFound(*short_id))?;
                    vec![entry.id.clone()]
                }
                Selector::Keyword(keyword) => {
                    let matched: Vec<EntryId> = self
                        .entries
                        .iter()
                        .filter(|entry| &entry.keyword == keyword)
                        .map(|entry| entry.id.clone())
                        .collect();
                    if matched.is_empty() {
                        return Err(TrackerError::KeywordNotFound(keyword.clone()));
                    }
                    matched
                }
            };
            ids.extend(matched.into_iter().filter(|id| seen.insert(id.clone())));
        }
        Ok(ids)
    }

    /// Resolves the entry a `stop` should act on.
    ///
    /// A keyword picks its most recently started running entry.
    pub fn stop_target(&self, selector: &Selector) -> Result<EntryId, TrackerError> {
        match selector {
            Selector::ShortId(short_id) => self
                .entry_by_short_id(*short_id)
                .map(|entry| entry.id.clone())
                .ok_or(TrackerError::ShortIdNotFound(*short_id)),
            Selector::Keyword(keyword) => self
                .latest_active_for_keyword(keyword)
                .map(|entry| entry.id.clone())
                .ok_or_else(|| TrackerError::NoActiveEntry(keyword.clone())),
        }
    }

    /// Resolves the source entry for a `continue`.
    ///
    /// Without a selector this is the most recently started stopped entry.
    /// A keyword picks its most recently started non-stashed entry.
    pub fn continue_source(&self, selector: Option<&Selector>) -> Result<EntryId, TrackerError> {
        let entry = match selector {
            None => self.last_resumable().ok_or(TrackerError::NothingToContinue)?,
            Some(Selector::ShortId(short_id)) => self
                .entry_by_short_id(*short_id)
                .ok_or(TrackerError::ShortIdNotFound(*short_id))?,
            Some(Selector::Keyword(keyword)) => self
                .latest_unstashed_for_keyword(keyword)
                .ok_or_else(|| TrackerError::KeywordNotFound(keyword.clone()))?,
        };
        Ok(entry.id.clone())
    }
}
