use anyhow::Result;
use scanorder_core::{
    render_plan, reorder_operation, ApplyOutcome, CopyDestination, OutputFormat, OutputFormatter,
    Preview, ReorderOptions,
};

use crate::cli::args::BatchArgs;
use crate::RunContext;

pub fn handle_reorder(
    batch: BatchArgs,
    dry_run: bool,
    copy_to: Option<Option<String>>,
    ctx: &RunContext,
) -> Result<bool> {
    let summary = ctx.output == OutputFormat::Summary;
    let preview: Option<Preview> = batch.preview.map(Into::into);

    let options = ReorderOptions {
        pad_width: batch.pad_width,
        dry_run,
        auto_approve: ctx.yes,
        // JSON output keeps stderr free of the table as well
        preview: if summary {
            preview.unwrap_or(Preview::None)
        } else {
            Preview::None
        },
        use_color: ctx.use_color,
        copy_to: copy_to.map(|dir| dir.map_or(CopyDestination::Sibling, CopyDestination::Directory)),
    };

    let outcome = reorder_operation(&batch.inputs, &options, ctx.working_dir.as_deref())?;
    Ok(print_outcome(&outcome, preview, ctx))
}

/// Print an apply outcome and report whether every rename went through
pub fn print_outcome(outcome: &ApplyOutcome, preview: Option<Preview>, ctx: &RunContext) -> bool {
    match outcome {
        ApplyOutcome::Applied(result) => {
            print!("{}", result.format(ctx.output));
            result.batch.is_complete()
        },
        ApplyOutcome::Copied(result) => {
            print!("{}", result.format(ctx.output));
            result.batch.is_complete()
        },
        ApplyOutcome::Aborted { pending } => {
            eprintln!(
                "Aborted: {} renames from the previous batch are still pending undo",
                pending
            );
            true
        },
        ApplyOutcome::DryRun(result) => {
            if ctx.output == OutputFormat::Summary {
                let rendered =
                    render_plan(&result.plan, preview.unwrap_or(Preview::Table), ctx.use_color);
                if !rendered.is_empty() {
                    println!("{}", rendered.trim_end());
                }
            }
            print!("{}", result.format(ctx.output));
            true
        },
    }
}
