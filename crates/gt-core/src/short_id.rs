//! Short-ID allocation and renumbering.
//!
//! Short IDs are the small integers users type on the command line. They are
//! dense (`1..=N` in insertion order) after every removal, so a held short ID
//! is only meaningful until the next mutating operation.

use std::collections::HashSet;

use crate::entry::Entry;

/// Highest short ID handed out by [`next_available`].
///
/// Numeric CLI arguments in `1..=MAX_SHORT_ID` address entries by short ID.
pub const MAX_SHORT_ID: u32 = 1_000;

/// Returns the smallest short ID in `1..=MAX_SHORT_ID` not used by `entries`.
///
/// When every ID is taken this falls back to `1`, which is not unique; the
/// next [`renumber`] restores uniqueness.
pub fn next_available(entries: &[Entry]) -> u32 {
    let used: HashSet<u32> = entries
        .iter()
        .map(|entry| entry.short_id)
        .filter(|id| (1..=MAX_SHORT_ID).contains(id))
        .collect();

    (1..=MAX_SHORT_ID)
        .find(|id| !used.contains(id))
        .unwrap_or_else(|| {
            tracing::warn!("all short IDs in use, falling back to 1");
            1
        })
}

/// Reassigns short IDs densely from 1, preserving insertion order.
pub fn renumber(entries: &mut [Entry]) {
    for (short_id, entry) in (1..).zip(entries.iter_mut()) {
        entry.short_id = short_id;
    }
}
