//! Start command: begin tracking a keyword.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use gt_core::Tracker;

use super::util::{describe, parse_duration};

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Keyword to track (must not be a number).
    pub keyword: String,

    /// Tags to attach.
    pub tags: Vec<String>,

    /// Start this long ago instead of now (e.g. 5, 30m, 1h30).
    #[arg(short, long)]
    pub backdate: Option<String>,
}

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &mut Tracker,
    args: &StartArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    let backdate = args.backdate.as_deref().map(parse_duration).transpose()?;
    let entry = tracker.start(&args.keyword, args.tags.clone(), backdate, now)?;

    write!(writer, "Started: {} (ID: {})", describe(&entry), entry.short_id)?;
    if let Some(backdate) = backdate {
        write!(writer, ", backdated {} minutes", backdate.num_minutes())?;
    }
    writeln!(writer)?;
    Ok(())
}
