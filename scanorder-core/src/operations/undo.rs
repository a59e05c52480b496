use super::state_dir;
use crate::error::ReorderError;
use crate::fs::RealFs;
use crate::journal::Journal;
use crate::lock::LockFile;
use crate::output::UndoReport;
use crate::renamer::Renamer;
use crate::session::SessionStore;
use anyhow::{Context, Result};
use std::path::Path;

/// High-level undo operation - equivalent to `scanorder undo` command.
///
/// Reverts whatever is left of the pending history. Entries that could not
/// be restored stay pending, so running it again retries only those.
pub fn undo_operation(working_dir: Option<&Path>) -> Result<UndoReport> {
    let state_dir = state_dir(working_dir)?;
    let lock = LockFile::acquire(&state_dir)
        .context("Failed to acquire lock for scanorder operation")?;

    let store = SessionStore::new(&state_dir);
    let mut session = store.load()?;
    if !session.has_pending_history() {
        return Err(ReorderError::NothingToUndo.into());
    }

    let plan_id = session.plan_id.clone();
    let log_name = plan_id.as_deref().unwrap_or("undo");
    let log_path = state_dir.join("logs").join(format!("{}.log", log_name));
    let journal = Journal::open(&log_path).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to open log file {}: {}", log_path.display(), e);
        Journal::disabled()
    });

    eprintln!("Restoring {} renamed files...", session.history().len());

    let mut fs = RealFs;
    let result = Renamer::new(&mut fs)
        .with_journal(journal)
        .with_checkpoint(|session| store.save(session))
        .undo(&mut session)?;

    store
        .save(&session)
        .context("Files were restored but the undo history could not be saved")?;
    lock.release()?;

    Ok(UndoReport {
        plan_id,
        remaining: session.history().len(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::{reorder_operation, ReorderOptions};
    use std::fs;
    use tempfile::TempDir;

    fn reordered(names: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("book1");
        fs::create_dir_all(&dir).unwrap();
        for name in names {
            fs::write(dir.join(name), name).unwrap();
        }
        reorder_operation(
            &["book1".to_string()],
            &ReorderOptions::default(),
            Some(temp_dir.path()),
        )
        .unwrap();
        temp_dir
    }

    #[test]
    fn test_undo_restores_original_names() {
        let temp_dir = reordered(&["p1.png", "p2.png", "p3.png"]);
        let dir = temp_dir.path().join("book1");
        assert!(!dir.join("p1.png").exists());

        let report = undo_operation(Some(temp_dir.path())).unwrap();
        assert_eq!(report.result.success_count, 3);
        assert_eq!(report.remaining, 0);
        for name in ["p1.png", "p2.png", "p3.png"] {
            assert_eq!(fs::read_to_string(dir.join(name)).unwrap(), name);
        }

        let err = undo_operation(Some(temp_dir.path())).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReorderError>(),
            Some(ReorderError::NothingToUndo)
        ));
    }

    #[test]
    fn test_undo_is_reinvocable_after_missing_file() {
        let temp_dir = reordered(&["p1.png", "p2.png"]);
        let dir = temp_dir.path().join("book1");
        let parked = temp_dir.path().join("parked.png");
        fs::rename(dir.join("book1_001.png"), &parked).unwrap();

        let report = undo_operation(Some(temp_dir.path())).unwrap();
        assert_eq!(report.result.success_count, 1);
        assert_eq!(report.result.not_found_count, 1);
        assert_eq!(report.remaining, 1);

        fs::rename(&parked, dir.join("book1_001.png")).unwrap();
        let report = undo_operation(Some(temp_dir.path())).unwrap();
        assert_eq!(report.result.success_count, 1);
        assert_eq!(report.remaining, 0);
        assert!(dir.join("p1.png").exists());
        assert!(dir.join("p2.png").exists());
    }
}
