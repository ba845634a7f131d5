//! Core domain logic for the gt time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Entries: the running, stopped, and stashed spans of tracked time
//! - Short IDs: dense numbering for command-line addressing
//! - The stash: pausing all running work as one bundle
//! - Undo: bounded, addressable snapshots of destructive operations
//! - Usage: which tags and keywords are in use
//!
//! All state lives in a [`Tracker`], which is passed explicitly to every
//! operation. Time-dependent operations take `now` as an argument.

mod edit;
mod entry;
mod error;
mod lifecycle;
mod selector;
pub mod short_id;
mod stash;
mod tracker;
pub mod types;
mod undo;
mod usage;

pub use edit::FieldEdit;
pub use entry::Entry;
pub use error::{ErrorKind, TrackerError};
pub use selector::Selector;
pub use stash::{PopReport, Stash};
pub use tracker::Tracker;
pub use types::{EntryId, StashId, UndoId, ValidationError};
pub use undo::{
    BatchRestoreError, BulkEditPayload, ClearPayload, DeletePayload, MAX_UNDO_HISTORY,
    RestoreReport, UndoOperation, UndoPayload, UndoRecord,
};
pub use usage::Usage;
