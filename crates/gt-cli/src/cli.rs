//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::add::AddArgs;
use crate::commands::delete::DeleteArgs;
use crate::commands::keywords::KeywordsAction;
use crate::commands::list::ListArgs;
use crate::commands::resume::ContinueArgs;
use crate::commands::set::SetArgs;
use crate::commands::stash::StashArgs;
use crate::commands::start::StartArgs;
use crate::commands::stop::StopArgs;
use crate::commands::tags::TagsAction;
use crate::commands::undo::UndoArgs;

/// Keyword time tracker.
///
/// Tracks labelled activities with start/stop, a stash for pausing all
/// running work, and undo for destructive operations.
#[derive(Debug, Parser)]
#[command(name = "gt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the tracker JSON document (overrides config).
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start tracking a keyword.
    Start(StartArgs),

    /// Stop a running entry.
    Stop(StopArgs),

    /// Start a new entry from a previous one.
    #[command(visible_aliases = ["cont", "c"])]
    Continue(ContinueArgs),

    /// Record a completed entry.
    Add(AddArgs),

    /// Delete entries (undoable).
    Delete(DeleteArgs),

    /// Edit a field on one or more entries (undoable).
    Set(SetArgs),

    /// List, rename, or remove tags (changes are undoable).
    #[command(subcommand)]
    Tags(TagsAction),

    /// List keywords in use.
    #[command(subcommand)]
    Keywords(KeywordsAction),

    /// Stash running entries, or manage the stash.
    Stash(StashArgs),

    /// Restore deleted, edited, or cleared entries.
    #[command(visible_alias = "u")]
    Undo(UndoArgs),

    /// List entries.
    #[command(visible_alias = "ls")]
    List(ListArgs),
}

impl Commands {
    /// Whether the command changes the tracker and must be saved.
    pub const fn mutates(&self) -> bool {
        match self {
            Self::List(_) | Self::Keywords(_) => false,
            Self::Tags(action) => action.mutates(),
            Self::Undo(args) => !args.list,
            Self::Stash(args) => args.mutates(),
            _ => true,
        }
    }
}
