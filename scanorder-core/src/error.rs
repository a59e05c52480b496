use std::io;
use thiserror::Error;

/// Structural errors that stop a batch before the filesystem is touched.
///
/// Per-file problems during apply and undo are never reported through this
/// type; they are counted in [`crate::BatchResult`] and [`crate::UndoResult`].
#[derive(Debug, Error)]
pub enum ReorderError {
    #[error("Cannot read directory {path}: {source}")]
    DirectoryRead {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("No supported image files found in {path}")]
    NoSupportedFiles { path: String },

    #[error("Entry '{name}' has no usable path")]
    MissingPath { name: String },

    #[error("{path} is not a supported image file")]
    UnsupportedFile { path: String },

    #[error("Plan collision: '{first}' and '{second}' would both be renamed to {path}")]
    PlanCollision {
        path: String,
        first: String,
        second: String,
    },

    #[error("{path} appears more than once in the batch")]
    DuplicateEntry { path: String },

    #[error("Pad width {width} is out of range: use 1 to 20 digits or 'dynamic'")]
    InvalidPadWidth { width: usize },

    #[error("Batch of {count} files does not fit a {width}-digit page number")]
    BatchTooLarge { count: usize, width: usize },

    #[error("Dropped files must all live in the same directory (found {first} and {second})")]
    MixedDirectories { first: String, second: String },

    #[error("Another batch is already running in this session")]
    SessionBusy,

    #[error("{pending} renames from the previous batch are still pending undo; discard them first")]
    PendingHistory { pending: usize },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Plan not found: {id}")]
    PlanNotFound { id: String },

    #[error("No saved plan found in {path}")]
    NoSavedPlan { path: String },
}

pub type ReorderResult<T> = std::result::Result<T, ReorderError>;
