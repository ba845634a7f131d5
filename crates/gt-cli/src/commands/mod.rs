//! CLI subcommand implementations.

pub mod add;
pub mod delete;
pub mod keywords;
pub mod list;
pub mod resume;
pub mod set;
pub mod stash;
pub mod start;
pub mod stop;
pub mod tags;
pub mod undo;
pub mod util;

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use gt_core::Tracker;

use crate::Commands;

/// Runs one subcommand against the tracker.
pub fn execute<W: Write>(
    writer: &mut W,
    tracker: &mut Tracker,
    command: &Commands,
    now: DateTime<Utc>,
) -> Result<()> {
    match command {
        Commands::Start(args) => start::run(writer, tracker, args, now),
        Commands::Stop(args) => stop::run(writer, tracker, args, now),
        Commands::Continue(args) => resume::run(writer, tracker, args, now),
        Commands::Add(args) => add::run(writer, tracker, args, now),
        Commands::Delete(args) => delete::run(writer, tracker, args, now),
        Commands::Set(args) => set::run(writer, tracker, args, now),
        Commands::Tags(action) => tags::run(writer, tracker, action, now),
        Commands::Keywords(action) => keywords::run(writer, tracker, action, now),
        Commands::Stash(args) => stash::run(writer, tracker, args, now),
        Commands::Undo(args) => undo::run(writer, tracker, args, now),
        Commands::List(args) => list::run(writer, tracker, args, now),
    }
}
