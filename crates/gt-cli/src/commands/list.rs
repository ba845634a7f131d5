//! List command: plain listing of entries.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use gt_core::Tracker;

use super::util::entry_line;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show running entries.
    #[arg(short, long)]
    pub active: bool,
}

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &Tracker,
    args: &ListArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    let entries: Vec<_> = tracker
        .entries()
        .iter()
        .filter(|entry| !args.active || entry.active)
        .collect();
    if entries.is_empty() {
        writeln!(writer, "No entries.")?;
        return Ok(());
    }
    for entry in entries {
        writeln!(writer, "{}", entry_line(entry, now))?;
    }
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

    fn tracker() -> Tracker {
        let mut tracker = Tracker::new();
        tracker
            .add_completed("a", vec!["x".to_string()], t0(), t0() + Duration::minutes(45))
            .unwrap();
        tracker.start("b", Vec::new(), None, t0()).unwrap();
        tracker
    }

    #[test]
    fn list_all_entries() {
        let mut output = Vec::new();

        run(
            &mut output,
            &tracker(),
            &ListArgs { active: false },
            t0() + Duration::hours(2),
        )
        .unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        1: a [x] - 00:45:00 (stopped)
        2: b - 02:00:00 (running)
        ");
    }

    #[test]
    fn list_active_only() {
        let mut output = Vec::new();

        run(
            &mut output,
            &tracker(),
            &ListArgs { active: true },
            t0() + Duration::minutes(1),
        )
        .unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @"2: b - 00:01:00 (running)");
    }

    #[test]
    fn list_empty() {
        let mut output = Vec::new();

        run(&mut output, &Tracker::new(), &ListArgs { active: false }, t0()).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @"No entries.");
    }
}
