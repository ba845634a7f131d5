//! Add command: record a completed entry after the fact.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use gt_core::Tracker;

use super::util::{describe, format_duration, parse_datetime};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Keyword to record (must not be a number).
    pub keyword: String,

    /// Tags to attach.
    pub tags: Vec<String>,

    /// Start time (RFC 3339 or e.g. "2 hours ago").
    #[arg(long)]
    pub start: String,

    /// End time (RFC 3339 or e.g. "30 minutes ago").
    #[arg(long)]
    pub end: String,
}

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &mut Tracker,
    args: &AddArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    let start = parse_datetime(&args.start, now).context("invalid --start")?;
    let end = parse_datetime(&args.end, now).context("invalid --end")?;
    let entry = tracker.add_completed(&args.keyword, args.tags.clone(), start, end)?;

    writeln!(
        writer,
        "Added: {} - {} (ID: {})",
        describe(&entry),
        format_duration(entry.duration),
        entry.short_id
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use insta::assert_snapshot;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 5, 17, 0, 0).unwrap()
    }

    fn args(start: &str, end: &str) -> AddArgs {
        AddArgs {
            keyword: "meeting".to_string(),
            tags: vec!["team".to_string()],
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    #[test]
    fn add_with_absolute_times() {
        let mut tracker = Tracker::new();
        let mut output = Vec::new();

        run(
            &mut output,
            &mut tracker,
            &args("2026-10-05T09:00:00Z", "2026-10-05T10:15:00Z"),
            t0(),
        )
        .unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @"Added: meeting [team] - 01:15:00 (ID: 1)");
        assert!(!tracker.entries()[0].active);
    }

    #[test]
    fn add_with_relative_times() {
        let mut tracker = Tracker::new();
        let mut output = Vec::new();

        run(
            &mut output,
            &mut tracker,
            &args("2 hours ago", "30 minutes ago"),
            t0(),
        )
        .unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @"Added: meeting [team] - 01:30:00 (ID: 1)");
    }

    #[test]
    fn add_rejects_end_before_start() {
        let mut tracker = Tracker::new();
        let mut output = Vec::new();

        let err = run(
            &mut output,
            &mut tracker,
            &args("30 minutes ago", "2 hours ago"),
            t0(),
        )
        .unwrap_err();

        assert_snapshot!(err.to_string(), @"end time must not be before start time");
        assert!(tracker.entries().is_empty());
    }
}
