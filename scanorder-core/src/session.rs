use crate::error::{ReorderError, ReorderResult};
use crate::plan::RenameOperation;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use ts_rs::TS;

const SESSION_FILE_NAME: &str = "session.json";

/// Renames that were committed by the last batch, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationHistory {
    operations: Vec<RenameOperation>,
}

impl OperationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, operation: RenameOperation) {
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn operations(&self) -> &[RenameOperation] {
        &self.operations
    }

    pub fn get(&self, index: usize) -> Option<&RenameOperation> {
        self.operations.get(index)
    }

    pub fn remove(&mut self, index: usize) -> RenameOperation {
        self.operations.remove(index)
    }

    pub fn clear(&mut self) {
        self.operations.clear();
    }
}

impl FromIterator<RenameOperation> for OperationHistory {
    fn from_iter<I: IntoIterator<Item = RenameOperation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

/// Where a session is in the apply / undo cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    IdleWithHistory,
    Processing,
    Undoing,
}

/// Mutable state of one directory-processing workflow.
///
/// Exactly one session exists per workflow and it is passed explicitly to
/// every apply and undo. The busy flags are never persisted: a session
/// loaded from disk always starts out idle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(skip)]
    processing: bool,
    #[serde(skip)]
    undoing: bool,
    #[serde(default)]
    history: OperationHistory,
    /// Plan whose renames are in `history`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    /// Directory the pending history belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.processing {
            SessionState::Processing
        } else if self.undoing {
            SessionState::Undoing
        } else if self.history.is_empty() {
            SessionState::Idle
        } else {
            SessionState::IdleWithHistory
        }
    }

    pub fn is_busy(&self) -> bool {
        self.processing || self.undoing
    }

    pub fn history(&self) -> &OperationHistory {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut OperationHistory {
        &mut self.history
    }

    pub fn has_pending_history(&self) -> bool {
        !self.history.is_empty()
    }

    /// Enter `Processing`; refused while busy or while a history is pending.
    pub(crate) fn begin_apply(&mut self, plan_id: &str, directory: &str) -> ReorderResult<()> {
        if self.is_busy() {
            return Err(ReorderError::SessionBusy);
        }
        if self.has_pending_history() {
            return Err(ReorderError::PendingHistory {
                pending: self.history.len(),
            });
        }
        self.processing = true;
        self.plan_id = Some(plan_id.to_string());
        self.directory = Some(directory.to_string());
        Ok(())
    }

    pub(crate) fn finish_apply(&mut self) {
        self.processing = false;
        if self.history.is_empty() {
            self.plan_id = None;
            self.directory = None;
        }
        self.touch();
    }

    /// Enter `Undoing`; refused while busy.
    pub(crate) fn begin_undo(&mut self) -> ReorderResult<()> {
        if self.is_busy() {
            return Err(ReorderError::SessionBusy);
        }
        self.undoing = true;
        Ok(())
    }

    pub(crate) fn finish_undo(&mut self) {
        self.undoing = false;
        if self.history.is_empty() {
            self.plan_id = None;
            self.directory = None;
        }
        self.touch();
    }

    /// Drop the pending history without reverting anything.
    ///
    /// This is the only way from `IdleWithHistory` straight back to `Idle`.
    /// Returns how many recorded renames were forgotten.
    pub fn discard_history(&mut self) -> ReorderResult<usize> {
        if self.is_busy() {
            return Err(ReorderError::SessionBusy);
        }
        let dropped = self.history.len();
        self.history.clear();
        self.plan_id = None;
        self.directory = None;
        self.touch();
        Ok(dropped)
    }

    fn touch(&mut self) {
        self.updated_at = Some(chrono::Local::now().to_rfc3339());
    }
}

/// Persists the session of a state directory between invocations
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(SESSION_FILE_NAME),
        }
    }

    /// Load the stored session, or a fresh one when none was saved yet
    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open session file: {}", self.path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse session file: {}", self.path.display()))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("Failed to create session file: {}", self.path.display()))?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, session)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn op(from: &str, to: &str) -> RenameOperation {
        RenameOperation::new(from, to)
    }

    #[test]
    fn test_state_transitions() {
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::Idle);

        session.begin_apply("plan1", "/s").unwrap();
        assert_eq!(session.state(), SessionState::Processing);
        assert!(matches!(
            session.begin_apply("plan2", "/s"),
            Err(ReorderError::SessionBusy)
        ));
        assert!(matches!(session.begin_undo(), Err(ReorderError::SessionBusy)));

        session.history_mut().record(op("/s/a", "/s/b"));
        session.finish_apply();
        assert_eq!(session.state(), SessionState::IdleWithHistory);
        assert_eq!(session.plan_id.as_deref(), Some("plan1"));

        assert!(matches!(
            session.begin_apply("plan2", "/s"),
            Err(ReorderError::PendingHistory { pending: 1 })
        ));

        session.begin_undo().unwrap();
        assert_eq!(session.state(), SessionState::Undoing);
        assert!(matches!(
            session.discard_history(),
            Err(ReorderError::SessionBusy)
        ));
        session.finish_undo();
        assert_eq!(session.state(), SessionState::IdleWithHistory);

        assert_eq!(session.discard_history().unwrap(), 1);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.plan_id.is_none());
    }

    #[test]
    fn test_empty_apply_leaves_no_plan() {
        let mut session = Session::new();
        session.begin_apply("plan1", "/s").unwrap();
        session.finish_apply();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.plan_id.is_none());
        assert!(session.directory.is_none());
    }

    #[test]
    fn test_store_round_trip_resets_flags() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::new(&temp_dir.path().join(".scanorder"));

        let mut session = store.load().unwrap();
        assert_eq!(session.state(), SessionState::Idle);

        session.begin_apply("abc", "/s").unwrap();
        session.history_mut().record(op("/s/1.png", "/s/s_001.png"));
        session.history_mut().record(op("/s/2.png", "/s/s_002.png"));
        store.save(&session).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.state(), SessionState::IdleWithHistory);
        assert_eq!(loaded.history().len(), 2);
        assert_eq!(loaded.history().operations()[1].new_path, "/s/s_002.png");
        assert_eq!(loaded.plan_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_history_serializes_as_plain_list() {
        let history: OperationHistory = vec![op("/a", "/b")].into_iter().collect();
        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(json, r#"[{"original_path":"/a","new_path":"/b"}]"#);
    }
}
