use super::{current_dir, plan_batch, resolve_batch, state_dir};
use crate::config::Config;
use crate::fs::RealFs;
use crate::lock::LockFile;
use crate::output::PlanResult;
use crate::plan::{write_plan, PadWidth};
use crate::renamer::simulate;
use anyhow::{Context, Result};
use std::path::Path;

/// Build the reorder plan for a folder or a set of files without renaming.
///
/// The plan is replayed on an in-memory copy of the directory listing so the
/// result already says which renames would fail. Unless `dry_run` is set the
/// plan is saved under `.scanorder/plans/<id>.json` for a later `apply`.
pub fn plan_operation(
    inputs: &[String],
    pad_width: Option<PadWidth>,
    dry_run: bool,
    working_dir: Option<&Path>,
) -> Result<PlanResult> {
    let base = current_dir(working_dir)?;
    let state_dir = state_dir(working_dir)?;
    let config = Config::load(&state_dir)?;
    let pad = match pad_width {
        Some(pad) => pad,
        None => config.pad_width()?,
    };

    let batch = resolve_batch(inputs, &base, &config.extension_filter())?;
    let plan = plan_batch(&batch, pad)?;
    let predicted = simulate(&plan, &RealFs)?;

    let saved_to = if dry_run {
        None
    } else {
        let _lock = LockFile::acquire(&state_dir)
            .context("Failed to acquire lock for scanorder operation")?;
        let path = state_dir.join("plans").join(format!("{}.json", plan.id));
        write_plan(&plan, &path)?;
        Some(path.display().to_string())
    };

    Ok(PlanResult {
        plan,
        dry_run,
        predicted: Some(predicted),
        skipped: batch.skipped.iter().map(ToString::to_string).collect(),
        saved_to,
    })
}
