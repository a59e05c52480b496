use super::apply::{open_journal, run_plan, ApplyOutcome};
use super::{current_dir, plan_batch, resolve_batch, state_dir};
use crate::config::Config;
use crate::copier::{copy_batch, simulate_copy};
use crate::fs::RealFs;
use crate::output::{CopyResult, PlanResult};
use crate::plan::{PadWidth, RenamePlan};
use crate::preview::{write_preview, Preview};
use crate::renamer::simulate;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Where `reorder --copy-to` writes the numbered copies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyDestination {
    /// `<folder>_reordered` next to the batch's folder
    Sibling,
    /// A folder given by the user, relative to the working directory
    Directory(String),
}

#[derive(Debug, Clone)]
pub struct ReorderOptions {
    /// Overrides the configured pad width
    pub pad_width: Option<PadWidth>,
    pub dry_run: bool,
    /// Discard a pending history without asking
    pub auto_approve: bool,
    /// Preview written to stderr before renaming
    pub preview: Preview,
    pub use_color: Option<bool>,
    /// Copy into another folder instead of renaming in place
    pub copy_to: Option<CopyDestination>,
}

impl Default for ReorderOptions {
    fn default() -> Self {
        Self {
            pad_width: None,
            dry_run: false,
            auto_approve: false,
            preview: Preview::None,
            use_color: None,
            copy_to: None,
        }
    }
}

/// Sort, interleave and rename a folder or a set of files in one go.
pub fn reorder_operation(
    inputs: &[String],
    options: &ReorderOptions,
    working_dir: Option<&Path>,
) -> Result<ApplyOutcome> {
    let base = current_dir(working_dir)?;
    let state_dir = state_dir(working_dir)?;
    let config = Config::load(&state_dir)?;
    let pad = match options.pad_width {
        Some(pad) => pad,
        None => config.pad_width()?,
    };

    let batch = resolve_batch(inputs, &base, &config.extension_filter())?;
    let plan = plan_batch(&batch, pad)?;
    let skipped: Vec<String> = batch.skipped.iter().map(ToString::to_string).collect();

    if let Some(ref destination) = options.copy_to {
        let output_dir = match destination {
            CopyDestination::Sibling => plan.sibling_output_dir(),
            CopyDestination::Directory(dir) => base.join(dir).to_string_lossy().into_owned(),
        };
        let plan = plan.rooted_at(&output_dir);
        return copy_plan(&plan, &output_dir, &state_dir, options, skipped);
    }

    if options.dry_run {
        let predicted = simulate(&plan, &RealFs)?;
        return Ok(ApplyOutcome::DryRun(PlanResult {
            plan,
            dry_run: true,
            predicted: Some(predicted),
            skipped,
            saved_to: None,
        }));
    }

    write_preview(&plan, options.preview, options.use_color)?;

    run_plan(&plan, &state_dir, options.auto_approve, skipped)
}

/// Copy the batch into `output_dir`. The session is left alone: the
/// originals never move, so there is nothing to undo.
fn copy_plan(
    plan: &RenamePlan,
    output_dir: &str,
    state_dir: &Path,
    options: &ReorderOptions,
    skipped: Vec<String>,
) -> Result<ApplyOutcome> {
    if options.dry_run {
        let predicted = simulate_copy(plan, output_dir, &RealFs)?;
        return Ok(ApplyOutcome::DryRun(PlanResult {
            plan: plan.clone(),
            dry_run: true,
            predicted: Some(predicted),
            skipped,
            saved_to: None,
        }));
    }

    write_preview(plan, options.preview, options.use_color)?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output folder: {}", output_dir))?;

    let mut journal = open_journal(state_dir, &plan.id);
    let log_path = journal.path().map(|path| path.display().to_string());

    eprintln!("Copying {} files into {}...", plan.len(), output_dir);

    let batch = copy_batch(&mut RealFs, plan, &mut journal)?;

    Ok(ApplyOutcome::Copied(CopyResult {
        plan_id: plan.id.clone(),
        source_directory: plan.directory.clone(),
        directory: output_dir.to_string(),
        batch,
        skipped,
        log_path,
    }))
}
