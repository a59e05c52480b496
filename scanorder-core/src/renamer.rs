use crate::error::{ReorderError, ReorderResult};
use crate::fs::{FileSystem, MemoryFs};
use crate::journal::Journal;
use crate::path_util::join_path;
use crate::plan::{check_operations, RenameOperation, RenamePlan};
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::path::Path;
use ts_rs::TS;

/// A rename that did not go through, with the reason shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OperationFailure {
    pub path: String,
    pub reason: String,
}

/// Outcome of applying a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BatchResult {
    #[ts(type = "number")]
    pub success_count: usize,
    #[ts(type = "number")]
    pub fail_count: usize,
    pub failures: Vec<OperationFailure>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.success_count + self.fail_count
    }

    pub fn is_complete(&self) -> bool {
        self.fail_count == 0
    }
}

/// Outcome of undoing the pending history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UndoResult {
    #[ts(type = "number")]
    pub success_count: usize,
    #[ts(type = "number")]
    pub fail_count: usize,
    #[ts(type = "number")]
    pub not_found_count: usize,
    pub failures: Vec<OperationFailure>,
    /// Renamed files that were no longer on disk
    pub not_found: Vec<String>,
}

impl UndoResult {
    /// True when every recorded rename was reverted and the history is gone
    pub fn is_complete(&self) -> bool {
        self.fail_count == 0 && self.not_found_count == 0
    }
}

/// Applies rename plans and reverts them, one filesystem call at a time.
///
/// Renames are issued strictly in plan order and each one finishes before
/// the next starts: a target of one operation may be the source of a later
/// one, so reordering or parallelising would change the outcome. A failed
/// rename is counted and the batch moves on; there is no mid-batch abort.
pub struct Renamer<'a, F: FileSystem + ?Sized> {
    fs: &'a mut F,
    journal: Journal,
    checkpoint: Option<Checkpoint<'a>>,
}

/// Called with the session after every change to its history
type Checkpoint<'a> = Box<dyn FnMut(&Session) -> anyhow::Result<()> + 'a>;

impl<'a, F: FileSystem + ?Sized> Renamer<'a, F> {
    pub fn new(fs: &'a mut F) -> Self {
        Self {
            fs,
            journal: Journal::disabled(),
            checkpoint: None,
        }
    }

    #[must_use]
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Persist the session after each recorded or reverted rename, so a
    /// process killed mid-batch still leaves an undoable history behind.
    #[must_use]
    pub fn with_checkpoint<C>(mut self, checkpoint: C) -> Self
    where
        C: FnMut(&Session) -> anyhow::Result<()> + 'a,
    {
        self.checkpoint = Some(Box::new(checkpoint));
        self
    }

    /// Apply every operation of `plan`, recording successes in the session.
    ///
    /// Refused before touching anything when the session is busy, when a
    /// previous history is still pending, or when the plan itself is invalid.
    pub fn apply(&mut self, plan: &RenamePlan, session: &mut Session) -> ReorderResult<BatchResult> {
        check_operations(&plan.operations)?;
        session.begin_apply(&plan.id, &plan.directory)?;

        self.journal.log(&format!(
            "apply plan {} in {} ({} operations)",
            plan.id,
            plan.directory,
            plan.len()
        ));

        let mut result = BatchResult::default();
        for op in &plan.operations {
            match self.rename_one(&op.original_path, &op.new_path) {
                Ok(()) => {
                    self.journal
                        .log(&format!("renamed {} -> {}", op.original_path, op.new_path));
                    session.history_mut().record(op.clone());
                    self.save_checkpoint(session);
                    result.success_count += 1;
                },
                Err(reason) => {
                    self.journal.log(&format!(
                        "FAILED {} -> {}: {}",
                        op.original_path, op.new_path, reason
                    ));
                    result.failures.push(OperationFailure {
                        path: op.original_path.clone(),
                        reason,
                    });
                    result.fail_count += 1;
                },
            }
        }

        self.journal.log(&format!(
            "apply finished: {} succeeded, {} failed",
            result.success_count, result.fail_count
        ));
        session.finish_apply();
        Ok(result)
    }

    /// Revert the session's pending history, most recent rename first.
    ///
    /// Entries whose renamed file has disappeared are counted as not found
    /// and left in the history, as are entries whose revert fails; calling
    /// `undo` again retries exactly those. The history is cleared only when
    /// every entry was reverted.
    pub fn undo(&mut self, session: &mut Session) -> ReorderResult<UndoResult> {
        session.begin_undo()?;

        let pending = session.history().len();
        self.journal
            .log(&format!("undo {} recorded renames", pending));

        let mut result = UndoResult::default();
        for idx in (0..pending).rev() {
            let Some(op) = session.history().get(idx).cloned() else {
                continue;
            };

            if !self.fs.exists(&op.new_path) {
                self.journal.log(&format!("NOT FOUND {}", op.new_path));
                result.not_found.push(op.new_path.clone());
                result.not_found_count += 1;
                continue;
            }

            match self.rename_one(&op.new_path, &op.original_path) {
                Ok(()) => {
                    self.journal
                        .log(&format!("restored {} -> {}", op.new_path, op.original_path));
                    session.history_mut().remove(idx);
                    self.save_checkpoint(session);
                    result.success_count += 1;
                },
                Err(reason) => {
                    self.journal.log(&format!(
                        "FAILED restoring {} -> {}: {}",
                        op.new_path, op.original_path, reason
                    ));
                    result.failures.push(OperationFailure {
                        path: op.new_path.clone(),
                        reason,
                    });
                    result.fail_count += 1;
                },
            }
        }

        if result.is_complete() {
            session.history_mut().clear();
        }

        self.journal.log(&format!(
            "undo finished: {} restored, {} failed, {} not found",
            result.success_count, result.fail_count, result.not_found_count
        ));
        session.finish_undo();
        Ok(result)
    }

    fn save_checkpoint(&mut self, session: &Session) {
        if let Some(save) = self.checkpoint.as_mut() {
            if let Err(e) = save(session) {
                self.journal
                    .log(&format!("WARNING session not saved: {:#}", e));
            }
        }
    }

    /// Rename a single file without ever replacing another one.
    fn rename_one(&mut self, from: &str, to: &str) -> Result<(), String> {
        if from == to {
            return if self.fs.exists(from) {
                Ok(())
            } else {
                Err("file not found".to_string())
            };
        }

        if from.eq_ignore_ascii_case(to) {
            return self.rename_case_only(from, to);
        }

        if self.fs.exists(to) {
            return Err(format!("target already exists: {}", to));
        }

        self.fs.rename(from, to).map_err(|e| e.to_string())
    }

    /// Case-only renames go through a temporary name. On a case-insensitive
    /// filesystem `to` and `from` are the same file, so existence alone
    /// cannot tell whether `to` is a different file that would be replaced.
    fn rename_case_only(&mut self, from: &str, to: &str) -> Result<(), String> {
        let temp = format!("{}.scanorder-{}.tmp", from, std::process::id());
        self.fs.rename(from, &temp).map_err(|e| e.to_string())?;

        if self.fs.exists(to) {
            // `to` is a distinct file on a case-sensitive filesystem
            self.fs.rename(&temp, from).map_err(|e| {
                format!("target already exists: {}; file left at {}: {}", to, temp, e)
            })?;
            return Err(format!("target already exists: {}", to));
        }

        self.fs
            .rename(&temp, to)
            .map_err(|e| match self.fs.rename(&temp, from) {
                Ok(()) => e.to_string(),
                Err(restore) => format!("{}; file left at {}: {}", e, temp, restore),
            })
    }
}

/// Predict the outcome of a plan without touching the disk.
///
/// The plan's directory is listed through `source` and replayed on an
/// in-memory copy, so collisions with files outside the batch show up as
/// failures before anything is renamed.
pub fn simulate<F: FileSystem + ?Sized>(
    plan: &RenamePlan,
    source: &F,
) -> ReorderResult<BatchResult> {
    let entries = source
        .list_directory(Path::new(&plan.directory))
        .map_err(|e| ReorderError::DirectoryRead {
            path: plan.directory.clone(),
            source: e,
        })?;

    let mut mem = MemoryFs::with_files(
        entries
            .iter()
            .map(|entry| join_path(&plan.directory, &entry.name)),
    );
    let mut session = Session::new();
    let result = Renamer::new(&mut mem).apply(plan, &mut session);
    result
}

/// Operations that would restore the pending history, in execution order
pub fn undo_preview(session: &Session) -> Vec<RenameOperation> {
    session
        .history()
        .operations()
        .iter()
        .rev()
        .map(RenameOperation::reversed)
        .collect()
}
