use crate::path_util::basename;
use crate::plan::RenamePlan;
use nu_ansi_term::{Color as AnsiColor, Style};
use std::fmt::Write;

/// Render one `old -> new` line per operation, in execution order
pub fn render_list(plan: &RenamePlan, use_color: bool) -> String {
    let mut output = String::new();

    let width = plan
        .operations
        .iter()
        .map(|op| basename(&op.original_path).chars().count())
        .max()
        .unwrap_or_default();

    for op in &plan.operations {
        let from = basename(&op.original_path);
        let to = basename(&op.new_path);
        let padding = " ".repeat(width.saturating_sub(from.chars().count()));

        if !use_color {
            let _ = writeln!(output, "{}{} -> {}", from, padding, to);
        } else if op.is_noop() {
            let dim = Style::new().dimmed();
            let _ = writeln!(output, "{}", dim.paint(format!("{}{} =  {}", from, padding, to)));
        } else {
            let _ = writeln!(
                output,
                "{}{} {} {}",
                AnsiColor::Red.paint(&from),
                padding,
                AnsiColor::DarkGray.paint("->"),
                AnsiColor::Green.bold().paint(&to)
            );
        }
    }

    output
}
