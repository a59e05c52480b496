use anyhow::Result;
use scanorder_core::{discard_operation, OutputFormatter};

use crate::RunContext;

pub fn handle_discard(ctx: &RunContext) -> Result<bool> {
    let result = discard_operation(ctx.working_dir.as_deref())?;
    print!("{}", result.format(ctx.output));
    Ok(true)
}
