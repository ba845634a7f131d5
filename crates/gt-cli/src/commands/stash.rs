//! Stash commands: pause all running work and resume it later.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use gt_core::Tracker;

use super::util::{describe, entry_line, parse_duration, parse_selectors};

#[derive(Debug, Args)]
pub struct StashArgs {
    /// With no action, stashes every running entry.
    #[command(subcommand)]
    pub action: Option<StashAction>,
}

#[derive(Debug, Subcommand)]
pub enum StashAction {
    /// List stashed entries.
    Show,
    /// Keep stashed entries as stopped history and drop the stash.
    Apply,
    /// Delete stashed entries (undoable).
    Clear,
    /// Resume stashed entries as new running entries.
    Pop {
        /// Keywords or short IDs to pop (default: all).
        targets: Vec<String>,

        /// Start the resumed entries this long ago (e.g. 5, 30m, 1h30).
        #[arg(short, long)]
        backdate: Option<String>,
    },
}

impl StashArgs {
    /// Whether this invocation changes the tracker.
    pub const fn mutates(&self) -> bool {
        !matches!(self.action, Some(StashAction::Show))
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &mut Tracker,
    args: &StashArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    match &args.action {
        None => {
            let stashed = tracker.stash_active(now)?;
            writeln!(writer, "Stashed {} entries:", stashed.len())?;
            for entry in &stashed {
                writeln!(writer, "{}", entry_line(entry, now))?;
            }
        }
        Some(StashAction::Show) => {
            if tracker.stash().is_none() {
                writeln!(writer, "No stash")?;
                return Ok(());
            }
            let stashed: Vec<_> = tracker.stashed_entries().collect();
            writeln!(writer, "Stash with {} entries:", stashed.len())?;
            for entry in stashed {
                writeln!(writer, "{}", entry_line(entry, now))?;
            }
        }
        Some(StashAction::Apply) => {
            let applied = tracker.apply_stash()?;
            writeln!(
                writer,
                "Applied stash: {} entries kept as stopped history",
                applied.len()
            )?;
        }
        Some(StashAction::Clear) => {
            let removed = tracker.clear_stash(now)?;
            writeln!(
                writer,
                "Cleared stash: deleted {} entries. Use 'gt undo' to restore.",
                removed.len()
            )?;
        }
        Some(StashAction::Pop { targets, backdate }) => {
            let selectors = parse_selectors(targets)?;
            let backdate = backdate.as_deref().map(parse_duration).transpose()?;
            let report = tracker.pop_stash(&selectors, backdate, now)?;
            for entry in &report.resumed {
                writeln!(
                    writer,
                    "Resumed: {} (ID: {})",
                    describe(entry),
                    entry.short_id
                )?;
            }
            for entry in &report.skipped {
                writeln!(
                    writer,
                    "Skipped: {} (ID: {}), keyword already running",
                    describe(entry),
                    entry.short_id
                )?;
            }
        }
    }
    Ok(())
}
