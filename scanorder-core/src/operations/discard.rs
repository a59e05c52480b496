use super::state_dir;
use crate::lock::LockFile;
use crate::output::DiscardResult;
use crate::session::SessionStore;
use anyhow::{Context, Result};
use std::path::Path;

/// Forget the pending history. The renamed files stay as they are and can no
/// longer be restored with `undo`.
pub fn discard_operation(working_dir: Option<&Path>) -> Result<DiscardResult> {
    let state_dir = state_dir(working_dir)?;
    let lock = LockFile::acquire(&state_dir)
        .context("Failed to acquire lock for scanorder operation")?;

    let store = SessionStore::new(&state_dir);
    let mut session = store.load()?;
    let plan_id = session.plan_id.clone();
    let discarded = session.discard_history()?;
    store.save(&session)?;
    lock.release()?;

    Ok(DiscardResult { plan_id, discarded })
}
