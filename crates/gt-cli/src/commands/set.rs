//! Set command: bulk-edit a field on selected entries.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use gt_core::{FieldEdit, Tracker};

use super::util::{entry_line, parse_datetime, parse_duration, parse_selectors, parse_tag_list};

/// Editable entry fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Field {
    Keyword,
    /// Comma-separated list.
    Tags,
    /// Seconds, or a compact duration like 1h30m.
    Duration,
    /// RFC 3339 or relative, e.g. "2 hours ago".
    Starttime,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Keywords (every entry for the keyword) or short IDs.
    #[arg(required = true)]
    pub targets: Vec<String>,

    /// Field to change.
    #[arg(short, long, value_enum)]
    pub field: Field,

    /// New value.
    #[arg(long, allow_hyphen_values = true)]
    pub value: String,
}

fn field_edit(field: Field, value: &str, now: DateTime<Utc>) -> Result<FieldEdit> {
    Ok(match field {
        Field::Keyword => FieldEdit::Keyword(value.trim().to_string()),
        Field::Tags => FieldEdit::Tags(parse_tag_list(value)),
        Field::Duration => match value.trim().parse::<i64>() {
            Ok(seconds) => FieldEdit::Duration(seconds),
            Err(_) => FieldEdit::Duration(parse_duration(value)?.num_seconds()),
        },
        Field::Starttime => {
            FieldEdit::StartTime(parse_datetime(value, now).context("invalid start time")?)
        }
    })
}

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &mut Tracker,
    args: &SetArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    let edit = field_edit(args.field, &args.value, now)?;
    let selectors = parse_selectors(&args.targets)?;
    let ids = tracker.select_ids(&selectors)?;
    let edited = tracker.bulk_edit(&ids, &edit, now)?;

    writeln!(
        writer,
        "Edited {} entries ({edit}). Use 'gt undo' to restore.",
        edited.len()
    )?;
    for entry in &edited {
        writeln!(writer, "{}", entry_line(entry, now))?;
    }
    Ok(())
}
