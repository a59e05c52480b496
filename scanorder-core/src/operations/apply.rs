use super::state_dir;
use crate::error::ReorderError;
use crate::fs::RealFs;
use crate::interrupt::confirm;
use crate::journal::Journal;
use crate::lock::LockFile;
use crate::output::{ApplyResult, CopyResult, PlanResult};
use crate::plan::{load_plan, RenamePlan};
use crate::renamer::Renamer;
use crate::session::SessionStore;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

/// What happened when a plan was handed to the renamer
#[derive(Debug)]
pub enum ApplyOutcome {
    Applied(ApplyResult),
    /// The batch was copied into another folder; nothing can be undone
    Copied(CopyResult),
    /// The user declined to discard the previous batch's history
    Aborted { pending: usize },
    /// Nothing was renamed; the plan and its predicted outcome
    DryRun(PlanResult),
}

/// Apply a plan saved by `plan_operation`.
///
/// `id` selects `.scanorder/plans/<id>.json`; `None` or `"latest"` picks the
/// most recently created plan. The plan file is removed once it has been
/// applied, since its renames now live in the session history.
pub fn apply_operation(
    id: Option<&str>,
    auto_approve: bool,
    working_dir: Option<&Path>,
) -> Result<ApplyOutcome> {
    let state_dir = state_dir(working_dir)?;
    let plan_path = resolve_plan_path(&state_dir, id)?;
    let plan = load_plan(&plan_path)?;

    let outcome = run_plan(&plan, &state_dir, auto_approve, Vec::new())?;

    if matches!(outcome, ApplyOutcome::Applied(_)) {
        if let Err(e) = fs::remove_file(&plan_path) {
            eprintln!(
                "Warning: Failed to delete plan file {}: {}",
                plan_path.display(),
                e
            );
        }
    }

    Ok(outcome)
}

/// Locate a saved plan by id, or the newest one
pub(crate) fn resolve_plan_path(state_dir: &Path, id: Option<&str>) -> Result<PathBuf> {
    let plans_dir = state_dir.join("plans");

    match id {
        Some(id) if id != "latest" => {
            let path = plans_dir.join(format!("{}.json", id));
            if !path.exists() {
                return Err(ReorderError::PlanNotFound { id: id.to_string() }.into());
            }
            Ok(path)
        },
        _ => latest_plan(&plans_dir)?
            .map(|(path, _)| path)
            .ok_or_else(|| {
                ReorderError::NoSavedPlan {
                    path: plans_dir.display().to_string(),
                }
                .into()
            }),
    }
}

/// Newest saved plan by creation time, if any
pub(crate) fn latest_plan(plans_dir: &Path) -> Result<Option<(PathBuf, RenamePlan)>> {
    if !plans_dir.exists() {
        return Ok(None);
    }

    let mut newest: Option<(PathBuf, RenamePlan)> = None;
    for entry in fs::read_dir(plans_dir)
        .with_context(|| format!("Failed to read plans directory: {}", plans_dir.display()))?
    {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Ok(plan) = load_plan(&path) else {
            eprintln!("Warning: Skipping unreadable plan file {}", path.display());
            continue;
        };
        let is_newer = newest
            .as_ref()
            .map_or(true, |(_, current)| plan_time(&plan) > plan_time(current));
        if is_newer {
            newest = Some((path, plan));
        }
    }

    Ok(newest)
}

/// `.scanorder/logs/<id>.log`, or a disabled journal if it cannot be opened
pub(crate) fn open_journal(state_dir: &Path, plan_id: &str) -> Journal {
    let log_path = state_dir.join("logs").join(format!("{}.log", plan_id));
    Journal::open(&log_path).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to open log file {}: {}", log_path.display(), e);
        Journal::disabled()
    })
}

fn plan_time(plan: &RenamePlan) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    chrono::DateTime::parse_from_rfc3339(&plan.created_at).ok()
}

/// Lock the state directory, settle any pending history and apply `plan`.
pub(crate) fn run_plan(
    plan: &RenamePlan,
    state_dir: &Path,
    auto_approve: bool,
    skipped: Vec<String>,
) -> Result<ApplyOutcome> {
    let lock = LockFile::acquire(state_dir)
        .context("Failed to acquire lock for scanorder operation")?;

    let store = SessionStore::new(state_dir);
    let mut session = store.load()?;

    let mut discarded = 0;
    if session.has_pending_history() {
        let pending = session.history().len();
        if !auto_approve {
            if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
                return Err(ReorderError::PendingHistory { pending }).context(
                    "Cannot ask for confirmation in non-interactive mode; \
                    run `scanorder undo` first or pass --yes",
                );
            }
            let question = format!(
                "{} renames from the previous batch can still be undone. Discard them?",
                pending
            );
            if !confirm(&question)? {
                return Ok(ApplyOutcome::Aborted { pending });
            }
        }
        discarded = session.discard_history()?;
        store.save(&session)?;
    }

    let journal = open_journal(state_dir, &plan.id);
    let log_path = journal.path().map(|path| path.display().to_string());

    eprintln!("Renaming {} files in {}...", plan.len(), plan.directory);

    let mut fs = RealFs;
    let batch = Renamer::new(&mut fs)
        .with_journal(journal)
        .with_checkpoint(|session| store.save(session))
        .apply(plan, &mut session)?;

    store
        .save(&session)
        .context("Renames were applied but the undo history could not be saved")?;
    lock.release()?;

    Ok(ApplyOutcome::Applied(ApplyResult {
        plan_id: plan.id.clone(),
        directory: plan.directory.clone(),
        batch,
        discarded,
        skipped,
        log_path,
    }))
}
