//! Delete command: remove entries by keyword or short ID.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use gt_core::Tracker;

use super::util::{describe, parse_selectors};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Keywords (every entry for the keyword) or short IDs.
    #[arg(required = true)]
    pub targets: Vec<String>,
}

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &mut Tracker,
    args: &DeleteArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    let selectors = parse_selectors(&args.targets)?;
    let ids = tracker.select_ids(&selectors)?;
    let removed = tracker.delete(&ids, now)?;

    for entry in &removed {
        writeln!(writer, "Deleted: {} (ID: {})", describe(entry), entry.short_id)?;
    }
    writeln!(
        writer,
        "Deleted {} entries. Use 'gt undo' to restore.",
        removed.len()
    )?;
    Ok(())
}
