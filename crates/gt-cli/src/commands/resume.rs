//! Continue command: start a new entry from a previous one.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use gt_core::{Selector, Tracker};

use super::util::describe;

#[derive(Debug, Args)]
pub struct ContinueArgs {
    /// Keyword (latest non-stashed entry) or short ID.
    ///
    /// Without a target, continues the most recently started stopped entry.
    pub target: Option<String>,

    /// Continue the most recently started stopped entry.
    #[arg(long, conflicts_with = "target")]
    pub last: bool,
}

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &mut Tracker,
    args: &ContinueArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    let selector = match (&args.target, args.last) {
        (Some(target), false) => Some(target.parse::<Selector>()?),
        _ => None,
    };
    let source = tracker.continue_source(selector.as_ref())?;
    let entry = tracker.continue_from(&source, now)?;

    writeln!(
        writer,
        "Continued: {} (ID: {})",
        describe(&entry),
        entry.short_id
    )?;
    Ok(())
}
