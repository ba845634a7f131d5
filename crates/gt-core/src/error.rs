//! Error taxonomy for tracker operations.

use thiserror::Error;

use crate::types::{EntryId, UndoId, ValidationError};

/// Broad classification of a [`TrackerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid arguments: reserved keywords, negative durations, empty values.
    Validation,
    /// The operation would break an invariant of the current state.
    Conflict,
    /// The referenced entry, keyword, stash, or undo record does not exist.
    NotFound,
    /// A stored snapshot is malformed or inconsistent with the store.
    Data,
}

/// Errors returned by tracker operations.
///
/// An operation that returns an error leaves the tracker unmodified.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(
        "an active stopwatch for keyword '{keyword}' is already running; stop it first, then use 'gt continue {keyword}'"
    )]
    KeywordActive { keyword: String },

    #[error("entry with ID {short_id} is already stopped")]
    NotRunning { short_id: u32 },

    #[error("entry with ID {short_id} is already running")]
    AlreadyRunning { short_id: u32 },

    #[error("entry with ID {short_id} is stashed; use 'gt stash pop' or 'gt stash apply'")]
    EntryStashed { short_id: u32 },

    #[error("stash already exists; only a single stash is supported")]
    StashExists,

    #[error("no entry found with short ID {0}")]
    ShortIdNotFound(u32),

    #[error("no entry found with ID {0}")]
    EntryNotFound(EntryId),

    #[error("no entries found for keyword '{0}'")]
    KeywordNotFound(String),

    #[error("no active entry found for keyword '{0}'")]
    NoActiveEntry(String),

    #[error("no entries found with tag '{0}'")]
    TagNotFound(String),

    #[error("no entries for keyword '{keyword}' have tag '{tag}'")]
    TagNotFoundForKeyword { tag: String, keyword: String },

    #[error("no previous entries found to continue")]
    NothingToContinue,

    #[error("no active entries to stash")]
    NothingToStash,

    #[error("no stash found")]
    NoStash,

    #[error("no stashed entries found for '{0}'")]
    NotStashed(String),

    #[error("undo record not found: {0}")]
    UndoNotFound(String),

    #[error("undo reference '{0}' is ambiguous")]
    UndoAmbiguous(String),

    #[error("undo record {record} has a malformed payload: {source}")]
    MalformedPayload {
        record: UndoId,
        #[source]
        source: serde_json::Error,
    },

    #[error("undo record {record} would restore entry {entry} which already exists")]
    DuplicateEntry { record: UndoId, entry: EntryId },
}

impl TrackerError {
    /// Returns the category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::KeywordActive { .. }
            | Self::NotRunning { .. }
            | Self::AlreadyRunning { .. }
            | Self::EntryStashed { .. }
            | Self::StashExists => ErrorKind::Conflict,
            Self::ShortIdNotFound(_)
            | Self::EntryNotFound(_)
            | Self::KeywordNotFound(_)
            | Self::NoActiveEntry(_)
            | Self::TagNotFound(_)
            | Self::TagNotFoundForKeyword { .. }
            | Self::NothingToContinue
            | Self::NothingToStash
            | Self::NoStash
            | Self::NotStashed(_)
            | Self::UndoNotFound(_)
            | Self::UndoAmbiguous(_) => ErrorKind::NotFound,
            Self::MalformedPayload { .. } | Self::DuplicateEntry { .. } => ErrorKind::Data,
        }
    }
}
