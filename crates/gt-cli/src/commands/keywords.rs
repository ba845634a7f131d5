//! Keywords commands: list the keywords in use.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use gt_core::Tracker;
use serde::Serialize;

use super::util::{entries_noun, format_duration};

#[derive(Debug, Subcommand)]
pub enum KeywordsAction {
    /// List every keyword of a non-stashed entry, alphabetically.
    List {
        /// Show entry counts and total time per keyword.
        #[arg(long)]
        count: bool,

        /// Show the entries for each keyword.
        #[arg(long)]
        usage: bool,

        /// Print keywords as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// One keyword in `--json` output.
#[derive(Debug, Serialize)]
struct KeywordSummary<'a> {
    keyword: &'a str,
    entries: usize,
    total_duration: i64,
}

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &Tracker,
    action: &KeywordsAction,
    now: DateTime<Utc>,
) -> Result<()> {
    let KeywordsAction::List { count, usage, json } = *action;
    let keywords = tracker.keyword_usage();

    if json {
        let summaries: Vec<KeywordSummary<'_>> = keywords
            .iter()
            .map(|keyword| KeywordSummary {
                keyword: &keyword.name,
                entries: keyword.count(),
                total_duration: keyword.total_duration(now),
            })
            .collect();
        let json =
            serde_json::to_string_pretty(&summaries).context("failed to serialize keywords")?;
        writeln!(writer, "{json}")?;
        return Ok(());
    }

    if tracker.entries().is_empty() {
        writeln!(writer, "No entries found")?;
        return Ok(());
    }
    if keywords.is_empty() {
        writeln!(writer, "No keywords found")?;
        return Ok(());
    }

    writeln!(writer, "Found {} unique keywords:", keywords.len())?;
    if usage {
        for keyword in &keywords {
            writeln!(
                writer,
                "{} ({} {}, {} total):",
                keyword.name,
                keyword.count(),
                entries_noun(keyword.count()),
                format_duration(keyword.total_duration(now))
            )?;
            for entry in &keyword.entries {
                writeln!(
                    writer,
                    "  [{}] ID:{} ({})",
                    entry.status(),
                    entry.short_id,
                    format_duration(entry.current_duration(now))
                )?;
            }
        }
    } else if count {
        let width = keywords.iter().map(|k| k.name.len()).max().unwrap_or(0);
        for keyword in &keywords {
            writeln!(
                writer,
                "  {:<width$}  ({} {}, {})",
                keyword.name,
                keyword.count(),
                entries_noun(keyword.count()),
                format_duration(keyword.total_duration(now))
            )?;
        }
    } else {
        for keyword in &keywords {
            writeln!(writer, "  {}", keyword.name)?;
        }
    }
    Ok(())
}
