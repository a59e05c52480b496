use anyhow::{Context, Result};
use scanorder_core::{status_operation, OutputFormatter};

use crate::RunContext;

pub fn handle_status(ctx: &RunContext) -> Result<bool> {
    let status =
        status_operation(ctx.working_dir.as_deref()).context("Failed to get status")?;
    print!("{}", status.format(ctx.output));
    Ok(true)
}
