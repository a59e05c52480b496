use crate::error::ReorderResult;
use crate::fs::{FileSystem, MemoryFs};
use crate::journal::Journal;
use crate::path_util::join_path;
use crate::plan::{check_operations, RenamePlan};
use crate::renamer::{BatchResult, OperationFailure};
use std::path::Path;

/// Copy every source of `plan` to its target, leaving the originals alone.
///
/// `plan` is expected to be rooted in an output folder (see
/// [`RenamePlan::rooted_at`]). Like a rename batch, an existing target is
/// never replaced and a failed copy does not stop the rest. Nothing is
/// recorded for undo: the originals are untouched.
pub fn copy_batch<F: FileSystem + ?Sized>(
    fs: &mut F,
    plan: &RenamePlan,
    journal: &mut Journal,
) -> ReorderResult<BatchResult> {
    check_operations(&plan.operations)?;

    journal.log(&format!(
        "copy plan {} from {} ({} files)",
        plan.id,
        plan.directory,
        plan.len()
    ));

    let mut result = BatchResult::default();
    for op in &plan.operations {
        let copied = if fs.exists(&op.new_path) {
            Err(format!("target already exists: {}", op.new_path))
        } else {
            fs.copy(&op.original_path, &op.new_path)
                .map_err(|e| e.to_string())
        };

        match copied {
            Ok(()) => {
                journal.log(&format!("copied {} -> {}", op.original_path, op.new_path));
                result.success_count += 1;
            },
            Err(reason) => {
                journal.log(&format!(
                    "FAILED copying {} -> {}: {}",
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

    journal.log(&format!(
        "copy finished: {} succeeded, {} failed",
        result.success_count, result.fail_count
    ));
    Ok(result)
}

/// Predict a copy batch against the current contents of `output_dir`.
///
/// An output folder that does not exist yet counts as empty.
pub fn simulate_copy<F: FileSystem + ?Sized>(
    plan: &RenamePlan,
    output_dir: &str,
    source: &F,
) -> ReorderResult<BatchResult> {
    let existing = source
        .list_directory(Path::new(output_dir))
        .unwrap_or_default();

    let mut mem = MemoryFs::with_files(
        existing
            .iter()
            .map(|entry| join_path(output_dir, &entry.name)),
    );
    for op in &plan.operations {
        mem.add_file(op.original_path.clone());
    }

    copy_batch(&mut mem, plan, &mut Journal::disabled())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReorderError;
    use crate::plan::{build_plan, FileEntry, PadWidth, RenameOperation};

    fn copy_plan(names: &[&str]) -> RenamePlan {
        let entries: Vec<FileEntry> = names
            .iter()
            .map(|name| FileEntry::new(*name, join_path("/s/b", name)))
            .collect();
        let plan = build_plan(&entries, &entries, PadWidth::Dynamic).unwrap();
        plan.rooted_at(&plan.sibling_output_dir())
    }

    fn files(mem: &MemoryFs) -> Vec<String> {
        mem.files().map(str::to_string).collect()
    }

    #[test]
    fn test_copy_leaves_originals_in_place() {
        let mut mem = MemoryFs::with_files(["/s/b/1.png", "/s/b/2.png", "/s/b/3.png"]);
        let plan = copy_plan(&["1.png", "2.png", "3.png"]);

        let result = copy_batch(&mut mem, &plan, &mut Journal::disabled()).unwrap();

        assert_eq!(result.success_count, 3);
        assert!(result.is_complete());
        assert_eq!(mem.rename_calls(), 0);
        assert_eq!(
            files(&mem),
            vec![
                "/s/b/1.png",
                "/s/b/2.png",
                "/s/b/3.png",
                "/s/b_reordered/b_001.png",
                "/s/b_reordered/b_002.png",
                "/s/b_reordered/b_003.png",
            ]
        );
    }

    #[test]
    fn test_copy_never_overwrites_and_continues() {
        let mut mem = MemoryFs::with_files([
            "/s/b/1.png",
            "/s/b/2.png",
            "/s/b/3.png",
            "/s/b_reordered/b_002.png",
        ]);
        mem.fail_on("/s/b/2.png");
        let plan = copy_plan(&["1.png", "2.png", "3.png"]);

        let result = copy_batch(&mut mem, &plan, &mut Journal::disabled()).unwrap();

        // Sorted 1 2 3, interleaved [2, 0, 1]: 3 -> 001, 1 -> 002, 2 -> 003
        assert_eq!(result.success_count, 1);
        assert_eq!(result.fail_count, 2);
        assert_eq!(result.failures[0].path, "/s/b/1.png");
        assert!(result.failures[0].reason.contains("target already exists"));
        assert_eq!(result.failures[1].path, "/s/b/2.png");
        assert!(result.failures[1].reason.contains("simulated failure"));
        assert!(mem.exists("/s/b_reordered/b_001.png"));
        assert!(!mem.exists("/s/b_reordered/b_003.png"));
        assert!(mem.exists("/s/b/2.png"));
    }

    #[test]
    fn test_copy_rejects_invalid_plan() {
        let mut mem = MemoryFs::with_files(["/s/b/1.png", "/s/b/2.png"]);
        let mut plan = copy_plan(&["1.png", "2.png"]);
        plan.operations[1] = RenameOperation::new("/s/b/2.png", plan.operations[0].new_path.clone());

        let err = copy_batch(&mut mem, &plan, &mut Journal::disabled()).unwrap_err();
        assert!(matches!(err, ReorderError::PlanCollision { .. }));
        assert_eq!(files(&mem), vec!["/s/b/1.png", "/s/b/2.png"]);
    }

    #[test]
    fn test_simulate_copy_sees_existing_output() {
        let existing = MemoryFs::with_files(["/s/b/1.png", "/s/b/2.png", "/s/b_reordered/b_001.png"]);
        let plan = copy_plan(&["1.png", "2.png"]);

        let predicted = simulate_copy(&plan, "/s/b_reordered", &existing).unwrap();
        assert_eq!(predicted.success_count, 1);
        assert_eq!(predicted.fail_count, 1);

        // A missing output folder is treated as empty
        let fresh = MemoryFs::with_files(["/s/b/1.png", "/s/b/2.png"]);
        let predicted = simulate_copy(&plan, "/s/b_reordered", &fresh).unwrap();
        assert!(predicted.is_complete());
    }
}
