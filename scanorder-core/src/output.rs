use crate::plan::{RenameOperation, RenamePlan};
use crate::renamer::{BatchResult, OperationFailure, UndoResult};
use crate::session::SessionState;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

/// Result of building a plan, with or without applying it
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResult {
    pub plan: RenamePlan,
    pub dry_run: bool,
    /// Outcome predicted by replaying the plan on a copy of the listing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted: Option<BatchResult>,
    /// Inputs excluded from the batch, with the reason
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
}

/// Result of applying a plan
#[derive(Debug, Serialize, Deserialize)]
pub struct ApplyResult {
    pub plan_id: String,
    pub directory: String,
    pub batch: BatchResult,
    /// Renames forgotten from an earlier batch before this one started
    pub discarded: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<String>,
}

/// Result of copying a batch into an output folder
#[derive(Debug, Serialize, Deserialize)]
pub struct CopyResult {
    pub plan_id: String,
    pub source_directory: String,
    /// Folder the numbered copies were written to
    pub directory: String,
    pub batch: BatchResult,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<String>,
}

/// Result of an undo run
#[derive(Debug, Serialize, Deserialize)]
pub struct UndoReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    pub result: UndoResult,
    /// Entries still pending after this run
    pub remaining: usize,
}

/// Result of a status query
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResult {
    pub state: SessionState,
    pub pending: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Renames `undo` would perform, in the order it performs them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub undo: Vec<RenameOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_plan: Option<SavedPlan>,
}

/// A plan saved by `plan` and not applied yet
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedPlan {
    pub id: String,
    pub directory: String,
    pub created_at: String,
    pub operations: usize,
}

/// Result of discarding the pending history
#[derive(Debug, Serialize, Deserialize)]
pub struct DiscardResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    pub discarded: usize,
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }
    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

fn push_failures(output: &mut String, failures: &[OperationFailure]) {
    for failure in failures {
        let _ = writeln!(output, "  ✗ {}: {}", failure.path, failure.reason);
    }
}

impl OutputFormatter for PlanResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "plan",
            "plan_id": self.plan.id,
            "dry_run": self.dry_run,
            "summary": {
                "files": self.plan.len(),
                "changes": self.plan.changes(),
                "pad_width": self.plan.pad_width,
            },
            "predicted": self.predicted,
            "skipped": self.skipped,
            "plan": self.plan,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = format!(
            "Reorder plan for {}: {} files as {}_{}\n",
            self.plan.directory,
            self.plan.len(),
            self.plan.prefix,
            "N".repeat(self.plan.pad_width)
        );

        for skipped in &self.skipped {
            let _ = writeln!(output, "Skipped: {}", skipped);
        }

        if let Some(ref predicted) = self.predicted {
            if predicted.is_complete() {
                let _ = writeln!(output, "All {} renames would succeed", predicted.total());
            } else {
                let _ = writeln!(
                    output,
                    "{} renames would succeed, {} would fail:",
                    predicted.success_count, predicted.fail_count
                );
                push_failures(&mut output, &predicted.failures);
            }
        }

        if self.dry_run {
            output.push_str("Dry run: nothing was renamed\n");
        } else {
            let _ = writeln!(output, "Plan ID: {}", self.plan.id);
            if let Some(ref saved) = self.saved_to {
                let _ = writeln!(output, "Saved to {}", saved);
            }
        }

        output
    }
}

impl OutputFormatter for ApplyResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.batch.is_complete(),
            "operation": "apply",
            "plan_id": self.plan_id,
            "directory": self.directory,
            "summary": {
                "success_count": self.batch.success_count,
                "fail_count": self.batch.fail_count,
                "discarded": self.discarded,
            },
            "failures": self.batch.failures,
            "skipped": self.skipped,
            "log_path": self.log_path,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();

        if self.discarded > 0 {
            let _ = writeln!(
                output,
                "Discarded {} pending renames from the previous batch",
                self.discarded
            );
        }
        for skipped in &self.skipped {
            let _ = writeln!(output, "Skipped: {}", skipped);
        }

        let _ = writeln!(
            output,
            "✓ Renamed {} of {} files in {}",
            self.batch.success_count,
            self.batch.total(),
            self.directory
        );

        if !self.batch.is_complete() {
            let _ = writeln!(output, "✗ {} renames failed:", self.batch.fail_count);
            push_failures(&mut output, &self.batch.failures);
        }

        if let Some(ref log_path) = self.log_path {
            let _ = writeln!(output, "Log: {}", log_path);
        }

        if self.batch.success_count > 0 {
            output.push_str("Undo with: scanorder undo\n");
        }

        output
    }
}

impl OutputFormatter for CopyResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.batch.is_complete(),
            "operation": "copy",
            "plan_id": self.plan_id,
            "source_directory": self.source_directory,
            "directory": self.directory,
            "summary": {
                "success_count": self.batch.success_count,
                "fail_count": self.batch.fail_count,
            },
            "failures": self.batch.failures,
            "skipped": self.skipped,
            "log_path": self.log_path,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();

        for skipped in &self.skipped {
            let _ = writeln!(output, "Skipped: {}", skipped);
        }

        let _ = writeln!(
            output,
            "✓ Copied {} of {} files into {}",
            self.batch.success_count,
            self.batch.total(),
            self.directory
        );

        if !self.batch.is_complete() {
            let _ = writeln!(output, "✗ {} copies failed:", self.batch.fail_count);
            push_failures(&mut output, &self.batch.failures);
        }

        if let Some(ref log_path) = self.log_path {
            let _ = writeln!(output, "Log: {}", log_path);
        }

        output
    }
}

impl OutputFormatter for UndoReport {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.result.is_complete(),
            "operation": "undo",
            "plan_id": self.plan_id,
            "summary": {
                "success_count": self.result.success_count,
                "fail_count": self.result.fail_count,
                "not_found_count": self.result.not_found_count,
                "remaining": self.remaining,
            },
            "failures": self.result.failures,
            "not_found": self.result.not_found,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = format!("✓ Restored {} files\n", self.result.success_count);

        if self.result.fail_count > 0 {
            let _ = writeln!(output, "✗ {} restores failed:", self.result.fail_count);
            push_failures(&mut output, &self.result.failures);
        }

        if self.result.not_found_count > 0 {
            let _ = writeln!(
                output,
                "? {} renamed files were not found:",
                self.result.not_found_count
            );
            for path in &self.result.not_found {
                let _ = writeln!(output, "  {}", path);
            }
        }

        if self.remaining > 0 {
            let _ = writeln!(
                output,
                "{} renames are still pending; fix the problems above and run undo again",
                self.remaining
            );
        }

        output
    }
}

impl OutputFormatter for StatusResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&self).unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();

        if self.pending > 0 {
            let _ = writeln!(
                output,
                "Pending undo: {} renames{}",
                self.pending,
                self.directory
                    .as_ref()
                    .map(|dir| format!(" in {}", dir))
                    .unwrap_or_default()
            );
            if let Some(ref plan_id) = self.plan_id {
                let _ = writeln!(output, "Plan ID: {}", plan_id);
            }
        } else {
            output.push_str("No pending renames\n");
        }

        if let Some(ref updated_at) = self.updated_at {
            let _ = writeln!(output, "Last change: {}", updated_at);
        }

        if let Some(ref plan) = self.latest_plan {
            let _ = writeln!(
                output,
                "Latest saved plan: {} ({} files in {}, created {})",
                plan.id, plan.operations, plan.directory, plan.created_at
            );
        }

        output
    }
}

impl OutputFormatter for DiscardResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "discard",
            "plan_id": self.plan_id,
            "discarded": self.discarded,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        if self.discarded == 0 {
            return "No pending renames to discard\n".to_string();
        }
        format!(
            "Discarded {} pending renames; they can no longer be undone\n",
            self.discarded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{build_plan, FileEntry, PadWidth};

    fn sample_plan() -> RenamePlan {
        let entries = vec![
            FileEntry::new("a.png", "/scans/book1/a.png"),
            FileEntry::new("b.png", "/scans/book1/b.png"),
        ];
        build_plan(&entries, &entries, PadWidth::Dynamic).unwrap()
    }

    fn failed_batch() -> BatchResult {
        BatchResult {
            success_count: 1,
            fail_count: 1,
            failures: vec![OperationFailure {
                path: "/scans/book1/b.png".to_string(),
                reason: "permission denied".to_string(),
            }],
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("summary".parse::<OutputFormat>().unwrap(), OutputFormat::Summary);
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_plan_result_json_format() {
        let result = PlanResult {
            plan: sample_plan(),
            dry_run: true,
            predicted: Some(failed_batch()),
            skipped: vec!["notes.txt is not a supported image file".to_string()],
            saved_to: None,
        };

        let value: serde_json::Value = serde_json::from_str(&result.format_json()).unwrap();
        assert_eq!(value["operation"], "plan");
        assert_eq!(value["dry_run"], true);
        assert_eq!(value["summary"]["files"], 2);
        assert_eq!(value["summary"]["pad_width"], 3);
        assert_eq!(value["predicted"]["fail_count"], 1);
        assert_eq!(
            value["plan"]["operations"][1]["new_path"],
            "/scans/book1/book1_002.png"
        );
    }

    #[test]
    fn test_plan_result_summary_format() {
        let result = PlanResult {
            plan: sample_plan(),
            dry_run: false,
            predicted: None,
            skipped: Vec::new(),
            saved_to: Some(".scanorder/plans/x.json".to_string()),
        };

        let summary = result.format_summary();
        assert!(summary.starts_with("Reorder plan for /scans/book1: 2 files as book1_NNN"));
        assert!(summary.contains("Plan ID: "));
        assert!(summary.contains("Saved to .scanorder/plans/x.json"));
    }

    #[test]
    fn test_apply_result_summary_lists_failures() {
        let result = ApplyResult {
            plan_id: "abc".to_string(),
            directory: "/scans/book1".to_string(),
            batch: failed_batch(),
            discarded: 0,
            skipped: Vec::new(),
            log_path: None,
        };

        insta::assert_snapshot!(result.format_summary(), @r"
        ✓ Renamed 1 of 2 files in /scans/book1
        ✗ 1 renames failed:
          ✗ /scans/book1/b.png: permission denied
        Undo with: scanorder undo
        ");
    }

    #[test]
    fn test_apply_result_json_reports_partial_failure() {
        let result = ApplyResult {
            plan_id: "abc".to_string(),
            directory: "/scans/book1".to_string(),
            batch: failed_batch(),
            discarded: 3,
            skipped: Vec::new(),
            log_path: Some("/tmp/abc.log".to_string()),
        };

        let value: serde_json::Value = serde_json::from_str(&result.format_json()).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["summary"]["success_count"], 1);
        assert_eq!(value["summary"]["discarded"], 3);
        assert_eq!(value["failures"][0]["reason"], "permission denied");
    }

    #[test]
    fn test_copy_result_formats() {
        let result = CopyResult {
            plan_id: "abc".to_string(),
            source_directory: "/scans/book1".to_string(),
            directory: "/scans/book1_reordered".to_string(),
            batch: failed_batch(),
            skipped: Vec::new(),
            log_path: None,
        };

        insta::assert_snapshot!(result.format_summary(), @r"
        ✓ Copied 1 of 2 files into /scans/book1_reordered
        ✗ 1 copies failed:
          ✗ /scans/book1/b.png: permission denied
        ");

        let value: serde_json::Value = serde_json::from_str(&result.format_json()).unwrap();
        assert_eq!(value["operation"], "copy");
        assert_eq!(value["success"], false);
        assert_eq!(value["source_directory"], "/scans/book1");
    }

    #[test]
    fn test_undo_report_summary() {
        let report = UndoReport {
            plan_id: Some("abc".to_string()),
            result: UndoResult {
                success_count: 4,
                fail_count: 0,
                not_found_count: 1,
                failures: Vec::new(),
                not_found: vec!["/scans/book1/book1_002.png".to_string()],
            },
            remaining: 1,
        };

        let summary = report.format_summary();
        assert!(summary.contains("✓ Restored 4 files"));
        assert!(summary.contains("/scans/book1/book1_002.png"));
        assert!(summary.contains("1 renames are still pending"));

        let value: serde_json::Value = serde_json::from_str(&report.format_json()).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["summary"]["not_found_count"], 1);
    }

    #[test]
    fn test_status_result_formats() {
        let status = StatusResult {
            state: SessionState::IdleWithHistory,
            pending: 12,
            plan_id: Some("abc".to_string()),
            directory: Some("/scans/book1".to_string()),
            updated_at: None,
            undo: Vec::new(),
            latest_plan: None,
        };

        assert!(status
            .format_summary()
            .contains("Pending undo: 12 renames in /scans/book1"));
        let json = status.format(OutputFormat::Json);
        assert!(json.contains("\"state\":\"idle_with_history\""));
        assert!(!json.contains("latest_plan"));
    }

    #[test]
    fn test_discard_result_summary() {
        let none = DiscardResult {
            plan_id: None,
            discarded: 0,
        };
        assert_eq!(none.format_summary(), "No pending renames to discard\n");

        let some = DiscardResult {
            plan_id: Some("abc".to_string()),
            discarded: 7,
        };
        assert!(some.format_summary().contains("Discarded 7"));
    }
}
