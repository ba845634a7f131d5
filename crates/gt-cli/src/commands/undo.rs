//! Undo command: restore deleted, bulk-edited, or cleared entries.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use gt_core::{RestoreReport, Tracker, UndoId};

use super::util::entry_line;

#[derive(Debug, Args)]
pub struct UndoArgs {
    /// Records to restore: `N`/`#N` (N-th most recent) or an ID prefix.
    ///
    /// A bare number beyond the history length is tried as an ID prefix.
    /// Defaults to the most recent record.
    pub refs: Vec<String>,

    /// Print the undo history as JSON instead of restoring.
    #[arg(short, long, conflicts_with = "refs")]
    pub list: bool,
}

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &mut Tracker,
    args: &UndoArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    if args.list {
        let json = serde_json::to_string_pretty(tracker.undo_history())
            .context("failed to serialize undo history")?;
        writeln!(writer, "{json}")?;
        return Ok(());
    }

    if tracker.undo_history().is_empty() {
        writeln!(writer, "No operations to undo.")?;
        return Ok(());
    }

    let ids = if args.refs.is_empty() {
        vec![tracker.find_undo("1")?]
    } else {
        args.refs
            .iter()
            .map(|reference| tracker.find_undo(reference))
            .collect::<Result<Vec<UndoId>, _>>()?
    };

    match tracker.restore_many(&ids, now) {
        Ok(reports) => {
            for report in &reports {
                write_report(writer, report, now)?;
            }
            Ok(())
        }
        Err(err) => {
            for report in &err.restored {
                write_report(writer, report, now)?;
            }
            Err(err.into())
        }
    }
}

fn write_report<W: Write>(writer: &mut W, report: &RestoreReport, now: DateTime<Utc>) -> Result<()> {
    writeln!(writer, "Undone: {}", report.description)?;
    writeln!(writer, "Restored {} entries:", report.restored.len())?;
    for entry in &report.restored {
        writeln!(writer, "{}", entry_line(entry, now))?;
    }
    for id in &report.missing {
        writeln!(writer, "Not restored (no longer exists): {id}")?;
    }
    Ok(())
}
