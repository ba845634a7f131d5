//! Stop command: stop one running entry or all of them.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;
use gt_core::{Selector, Tracker};

use super::util::{describe, format_duration};

#[derive(Debug, Args)]
pub struct StopArgs {
    /// Keyword (latest running entry) or short ID.
    pub target: Option<String>,

    /// Stop every running entry.
    #[arg(short, long, conflicts_with = "target")]
    pub all: bool,
}

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &mut Tracker,
    args: &StopArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    if args.all {
        let stopped = tracker.stop_all(now);
        if stopped.is_empty() {
            writeln!(writer, "No active entries to stop")?;
            return Ok(());
        }
        for entry in &stopped {
            writeln!(
                writer,
                "Stopped: {} - {}",
                describe(entry),
                format_duration(entry.duration)
            )?;
        }
        writeln!(writer, "Stopped {} entries", stopped.len())?;
        return Ok(());
    }

    let Some(target) = &args.target else {
        bail!("specify a keyword or ID to stop, or use --all");
    };
    let selector: Selector = target.parse()?;
    let id = tracker.stop_target(&selector)?;
    let entry = tracker.stop(&id, now)?;
    writeln!(
        writer,
        "Stopped: {} - {}",
        describe(&entry),
        format_duration(entry.duration)
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone};
    use insta::assert_snapshot;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 5, 9, 0, 0).unwrap()
    }

    fn tracker_with(keywords: &[&str]) -> Tracker {
        let mut tracker = Tracker::new();
        for keyword in keywords {
            tracker
                .start(keyword, vec!["t".to_string()], None, t0())
                .unwrap();
        }
        tracker
    }

    fn args(target: Option<&str>, all: bool) -> StopArgs {
        StopArgs {
            target: target.map(ToString::to_string),
            all,
        }
    }

    #[test]
    fn stop_by_keyword() {
        let mut tracker = tracker_with(&["coding"]);
        let mut output = Vec::new();

        run(
            &mut output,
            &mut tracker,
            &args(Some("coding"), false),
            t0() + Duration::seconds(3_725),
        )
        .unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @"Stopped: coding [t] - 01:02:05");
    }

    #[test]
    fn stop_by_short_id_rejects_stopped_entry() {
        let mut tracker = tracker_with(&["coding"]);
        let mut output = Vec::new();
        run(&mut output, &mut tracker, &args(Some("1"), false), t0()).unwrap();

        let err = run(&mut output, &mut tracker, &args(Some("1"), false), t0()).unwrap_err();
        assert_snapshot!(err.to_string(), @"entry with ID 1 is already stopped");
    }

    #[test]
    fn stop_all() {
        let mut tracker = tracker_with(&["a", "b"]);
        let mut output = Vec::new();

        run(
            &mut output,
            &mut tracker,
            &args(None, true),
            t0() + Duration::minutes(10),
        )
        .unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Stopped: a [t] - 00:10:00
        Stopped: b [t] - 00:10:00
        Stopped 2 entries
        ");
    }

    #[test]
    fn stop_all_with_nothing_running() {
        let mut tracker = Tracker::new();
        let mut output = Vec::new();

        run(&mut output, &mut tracker, &args(None, true), t0()).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @"No active entries to stop");
    }

    #[test]
    fn stop_requires_a_target() {
        let mut tracker = tracker_with(&["a"]);
        let mut output = Vec::new();

        let err = run(&mut output, &mut tracker, &args(None, false), t0()).unwrap_err();
        assert!(err.to_string().contains("--all"));
    }
}
