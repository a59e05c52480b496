use anyhow::Result;
use scanorder_core::{plan_operation, render_plan, OutputFormat, OutputFormatter, Preview};

use crate::cli::args::BatchArgs;
use crate::RunContext;

pub fn handle_plan(batch: BatchArgs, dry_run: bool, ctx: &RunContext) -> Result<bool> {
    let result = plan_operation(
        &batch.inputs,
        batch.pad_width,
        dry_run,
        ctx.working_dir.as_deref(),
    )?;

    if ctx.output == OutputFormat::Summary {
        let preview = batch.preview.map_or(Preview::Table, Into::into);
        let rendered = render_plan(&result.plan, preview, ctx.use_color);
        if !rendered.is_empty() {
            println!("{}", rendered.trim_end());
        }
    }
    print!("{}", result.format(ctx.output));

    Ok(true)
}
