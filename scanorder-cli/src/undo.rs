use anyhow::Result;
use scanorder_core::{undo_operation, OutputFormatter};

use crate::RunContext;

pub fn handle_undo(ctx: &RunContext) -> Result<bool> {
    let report = undo_operation(ctx.working_dir.as_deref())?;
    print!("{}", report.format(ctx.output));
    Ok(report.result.is_complete())
}
