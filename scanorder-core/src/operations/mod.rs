//! High-level operations that correspond to CLI commands
//!
//! Each operation resolves its state directory from `working_dir`, takes the
//! lock when it changes anything, and returns structured results; printing
//! is left to the caller.

pub mod apply;
pub mod discard;
pub mod plan;
pub mod reorder;
pub mod status;
pub mod undo;

pub use apply::{apply_operation, ApplyOutcome};
pub use discard::discard_operation;
pub use plan::plan_operation;
pub use reorder::{reorder_operation, CopyDestination, ReorderOptions};
pub use status::status_operation;
pub use undo::undo_operation;

use crate::error::ReorderResult;
use crate::fs::RealFs;
use crate::interleave::interleave;
use crate::natural::sort_entries;
use crate::plan::{build_plan, PadWidth, RenamePlan};
use crate::scan::{resolve_input, DroppedInput, ExtensionFilter, ResolvedBatch};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const STATE_DIR_NAME: &str = ".scanorder";

pub(crate) fn current_dir(working_dir: Option<&Path>) -> Result<PathBuf> {
    match working_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir().context("Failed to get current directory"),
    }
}

/// `.scanorder/` under the working directory
pub fn state_dir(working_dir: Option<&Path>) -> Result<PathBuf> {
    Ok(current_dir(working_dir)?.join(STATE_DIR_NAME))
}

/// Normalize a path by removing Windows long path prefix if present
fn normalize_path(path: &Path) -> PathBuf {
    #[cfg(windows)]
    {
        let path_str = path.to_string_lossy();
        if let Some(stripped) = path_str.strip_prefix(r"\\?\") {
            PathBuf::from(stripped)
        } else {
            path.to_path_buf()
        }
    }
    #[cfg(not(windows))]
    {
        path.to_path_buf()
    }
}

/// Absolute, canonical form of an input so `.` or `..` never become a prefix
fn absolute_input(input: &str, base: &Path) -> String {
    let path = Path::new(input);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let resolved = absolute
        .canonicalize()
        .map_or(absolute, |canonical| normalize_path(&canonical));
    resolved.to_string_lossy().into_owned()
}

/// Turn command line inputs into a dropped folder or a set of dropped files
pub(crate) fn classify_inputs(inputs: &[String], base: &Path) -> DroppedInput {
    let absolute: Vec<String> = inputs
        .iter()
        .map(|input| absolute_input(input, base))
        .collect();

    DroppedInput::classify(absolute, |path| Path::new(path).is_dir())
}

pub(crate) fn resolve_batch(
    inputs: &[String],
    base: &Path,
    filter: &ExtensionFilter,
) -> ReorderResult<ResolvedBatch> {
    resolve_input(&RealFs, classify_inputs(inputs, base), filter)
}

/// Natural sort, interleave and derive target names for a resolved batch
pub fn plan_batch(batch: &ResolvedBatch, pad: PadWidth) -> ReorderResult<RenamePlan> {
    let sorted = sort_entries(batch.entries.clone());
    let interleaved = interleave(&sorted);
    build_plan(&interleaved, &sorted, pad)
}
