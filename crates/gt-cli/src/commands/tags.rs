//! Tags commands: list, rename, or remove tags across entries.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use gt_core::{Tracker, Usage};

use super::util::{entries_noun, format_duration};

#[derive(Debug, Subcommand)]
pub enum TagsAction {
    /// List every tag in use, alphabetically.
    List {
        /// Show how many entries carry each tag.
        #[arg(long)]
        count: bool,

        /// Show the entries carrying each tag.
        #[arg(long)]
        usage: bool,
    },
    /// Rename a tag on every entry carrying it.
    Rename {
        /// Existing tag.
        old: String,
        /// Replacement tag.
        new: String,
    },
    /// Remove a tag from every entry carrying it.
    Remove {
        /// Tag to remove.
        tag: String,
        /// Only remove the tag from entries for this keyword.
        keyword: Option<String>,
    },
}

impl TagsAction {
    /// Whether this invocation changes the tracker.
    pub const fn mutates(&self) -> bool {
        !matches!(self, Self::List { .. })
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &mut Tracker,
    action: &TagsAction,
    now: DateTime<Utc>,
) -> Result<()> {
    match action {
        TagsAction::List { count, usage } => list(writer, tracker, *count, *usage, now)?,
        TagsAction::Rename { old, new } => {
            let edited = tracker.rename_tag(old, new, now)?;
            writeln!(
                writer,
                "Renamed tag '{old}' to '{new}' on {} {}",
                edited.len(),
                entries_noun(edited.len())
            )?;
        }
        TagsAction::Remove { tag, keyword } => {
            let edited = tracker.remove_tag(tag, keyword.as_deref(), now)?;
            write!(
                writer,
                "Removed tag '{tag}' from {} {}",
                edited.len(),
                entries_noun(edited.len())
            )?;
            match keyword {
                Some(keyword) => writeln!(writer, " (keyword: {keyword})")?,
                None => writeln!(writer)?,
            }
        }
    }
    Ok(())
}

fn list<W: Write>(
    writer: &mut W,
    tracker: &Tracker,
    count: bool,
    usage: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    if tracker.entries().is_empty() {
        writeln!(writer, "No entries found")?;
        return Ok(());
    }
    let tags = tracker.tag_usage();
    if tags.is_empty() {
        writeln!(writer, "No tags found")?;
        return Ok(());
    }

    writeln!(writer, "Found {} unique tags:", tags.len())?;
    if usage {
        write_entries_per_tag(writer, &tags, now)?;
    } else if count {
        let width = tags.iter().map(|tag| tag.name.len()).max().unwrap_or(0);
        for tag in &tags {
            writeln!(
                writer,
                "  {:<width$}  ({} {})",
                tag.name,
                tag.count(),
                entries_noun(tag.count())
            )?;
        }
    } else {
        for tag in &tags {
            writeln!(writer, "  {}", tag.name)?;
        }
    }
    Ok(())
}

fn write_entries_per_tag<W: Write>(writer: &mut W, tags: &[Usage], now: DateTime<Utc>) -> Result<()> {
    for tag in tags {
        writeln!(
            writer,
            "{} ({} {}):",
            tag.name,
            tag.count(),
            entries_noun(tag.count())
        )?;
        for entry in &tag.entries {
            writeln!(
                writer,
                "  [{}] ID:{} {} ({})",
                entry.status(),
                entry.short_id,
                entry.keyword,
                format_duration(entry.current_duration(now))
            )?;
        }
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

    fn tagged_tracker() -> Tracker {
        let mut tracker = Tracker::new();
        tracker
            .add_completed("a", vec!["old".to_string()], t0(), t0())
            .unwrap();
        tracker
            .add_completed("b", vec!["old".to_string(), "keep".to_string()], t0(), t0())
            .unwrap();
        tracker
    }

    fn list_action(count: bool, usage: bool) -> TagsAction {
        TagsAction::List { count, usage }
    }

    fn render(tracker: &mut Tracker, action: &TagsAction, now: DateTime<Utc>) -> String {
        let mut output = Vec::new();
        run(&mut output, tracker, action, now).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn rename_tag() {
        let mut tracker = tagged_tracker();
        let action = TagsAction::Rename {
            old: "old".to_string(),
            new: "new".to_string(),
        };

        let output = render(&mut tracker, &action, t0());

        assert_snapshot!(output, @"Renamed tag 'old' to 'new' on 2 entries");
        assert_eq!(tracker.entries()[1].tags, vec!["new", "keep"]);
    }

    #[test]
    fn remove_tag() {
        let mut tracker = tagged_tracker();
        let action = TagsAction::Remove {
            tag: "keep".to_string(),
            keyword: None,
        };

        let output = render(&mut tracker, &action, t0());

        assert_snapshot!(output, @"Removed tag 'keep' from 1 entry");
    }

    #[test]
    fn remove_tag_for_one_keyword() {
        let mut tracker = tagged_tracker();
        let action = TagsAction::Remove {
            tag: "old".to_string(),
            keyword: Some("b".to_string()),
        };

        let output = render(&mut tracker, &action, t0());

        assert_snapshot!(output, @"Removed tag 'old' from 1 entry (keyword: b)");
        assert_eq!(tracker.entries()[0].tags, vec!["old"]);
        assert_eq!(tracker.entries()[1].tags, vec!["keep"]);
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let mut tracker = tagged_tracker();
        let mut output = Vec::new();
        let action = TagsAction::Remove {
            tag: "missing".to_string(),
            keyword: None,
        };

        let err = run(&mut output, &mut tracker, &action, t0()).unwrap_err();

        assert_snapshot!(err.to_string(), @"no entries found with tag 'missing'");
    }

    #[test]
    fn list_tags() {
        let mut tracker = tagged_tracker();

        assert_snapshot!(render(&mut tracker, &list_action(false, false), t0()), @r"
        Found 2 unique tags:
          keep
          old
        ");
    }

    #[test]
    fn list_tags_with_counts() {
        let mut tracker = tagged_tracker();

        assert_snapshot!(render(&mut tracker, &list_action(true, false), t0()), @r"
        Found 2 unique tags:
          keep  (1 entry)
          old   (2 entries)
        ");
    }

    #[test]
    fn list_tags_with_usage() {
        let mut tracker = tagged_tracker();
        tracker
            .start("c", vec!["keep".to_string()], None, t0())
            .unwrap();

        let output = render(&mut tracker, &list_action(false, true), t0() + Duration::minutes(10));

        assert_snapshot!(output, @r"
        Found 2 unique tags:
        keep (2 entries):
          [stopped] ID:2 b (00:00:00)
          [running] ID:3 c (00:10:00)
        old (2 entries):
          [stopped] ID:1 a (00:00:00)
          [stopped] ID:2 b (00:00:00)
        ");
    }

    #[test]
    fn list_without_tags() {
        let mut tracker = Tracker::new();
        assert_snapshot!(render(&mut tracker, &list_action(false, false), t0()), @"No entries found");

        tracker.add_completed("a", Vec::new(), t0(), t0()).unwrap();
        assert_snapshot!(render(&mut tracker, &list_action(true, false), t0()), @"No tags found");
    }

    #[test]
    fn list_does_not_mutate() {
        assert!(!list_action(true, true).mutates());
        assert!(
            TagsAction::Remove {
                tag: "x".to_string(),
                keyword: None,
            }
            .mutates()
        );
    }
}
