use super::apply::latest_plan;
use super::state_dir;
use crate::output::{SavedPlan, StatusResult};
use crate::renamer::undo_preview;
use crate::session::SessionStore;
use anyhow::Result;
use std::path::Path;

/// Status operation - returns structured data
pub fn status_operation(working_dir: Option<&Path>) -> Result<StatusResult> {
    let state_dir = state_dir(working_dir)?;
    let session = SessionStore::new(&state_dir).load()?;

    let latest_plan = latest_plan(&state_dir.join("plans"))?.map(|(_, plan)| SavedPlan {
        operations: plan.len(),
        id: plan.id,
        directory: plan.directory,
        created_at: plan.created_at,
    });

    Ok(StatusResult {
        state: session.state(),
        pending: session.history().len(),
        plan_id: session.plan_id.clone(),
        directory: session.directory.clone(),
        updated_at: session.updated_at.clone(),
        undo: undo_preview(&session),
        latest_plan,
    })
}
