mod json;
mod list;
mod table;

pub use json::render_json;
pub use list::render_list;
pub use table::render_table;

use crate::plan::RenamePlan;
use anyhow::Result;
use std::io::{self, IsTerminal, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preview {
    Table,
    List,
    Json,
    None,
}

impl std::str::FromStr for Preview {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "list" => Ok(Self::List),
            "json" => Ok(Self::Json),
            "none" => Ok(Self::None),
            _ => Err(format!("Invalid preview format: {}", s)),
        }
    }
}

/// Determine whether to use colors based on explicit preference or terminal detection
pub fn should_use_color_with_detector<F>(use_color: Option<bool>, is_terminal: F) -> bool
where
    F: Fn() -> bool,
{
    use_color.unwrap_or_else(is_terminal)
}

pub fn should_use_color(use_color: Option<bool>) -> bool {
    should_use_color_with_detector(use_color, || io::stdout().is_terminal())
}

pub fn render_plan(plan: &RenamePlan, format: Preview, use_color: Option<bool>) -> String {
    let use_color = should_use_color(use_color);

    match format {
        Preview::Table => render_table(plan, use_color, false),
        Preview::List => render_list(plan, use_color),
        Preview::Json => render_json(plan),
        Preview::None => String::new(),
    }
}

/// Write plan preview to stderr, keeping stdout for the result
pub fn write_preview(plan: &RenamePlan, format: Preview, use_color: Option<bool>) -> Result<()> {
    let output = render_plan(plan, format, use_color);
    if output.is_empty() {
        return Ok(());
    }
    let mut stderr = io::stderr();
    writeln!(stderr, "{}", output.trim_end())?;
    stderr.flush()?;
    Ok(())
}
