use anyhow::Result;
use scanorder_core::apply_operation;

use crate::reorder::print_outcome;
use crate::RunContext;

pub fn handle_apply(id: Option<String>, ctx: &RunContext) -> Result<bool> {
    let outcome = apply_operation(id.as_deref(), ctx.yes, ctx.working_dir.as_deref())?;
    Ok(print_outcome(&outcome, None, ctx))
}
