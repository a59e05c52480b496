use crate::path_util::basename;
use crate::plan::RenamePlan;
use comfy_table::{Cell, Color, ColumnConstraint, ContentArrangement, Table, Width};
use std::io::{self, IsTerminal};

/// Render plan as a `# / From / To` table with optional fixed column widths
pub fn render_table(plan: &RenamePlan, use_color: bool, fixed_table_width: bool) -> String {
    let mut table = Table::new();

    if fixed_table_width || !io::stdout().is_terminal() {
        table.set_content_arrangement(ContentArrangement::Disabled);
        table.set_constraints(vec![
            ColumnConstraint::Absolute(Width::Fixed(8)),  // #
            ColumnConstraint::Absolute(Width::Fixed(50)), // From
            ColumnConstraint::Absolute(Width::Fixed(50)), // To
        ]);
    } else {
        table.set_content_arrangement(ContentArrangement::Dynamic);
    }

    // Force styling even in non-TTY environments when colors are explicitly requested
    if use_color {
        table.enforce_styling();
        table.set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("From").fg(Color::Cyan),
            Cell::new("To").fg(Color::Cyan),
        ]);
    } else {
        table.set_header(vec!["#", "From", "To"]);
    }

    for (position, op) in plan.operations.iter().enumerate() {
        let number = (position + 1).to_string();
        let from = basename(&op.original_path);
        let to = basename(&op.new_path);

        if use_color {
            let to_color = if op.is_noop() {
                Color::DarkGrey
            } else {
                Color::Green
            };
            table.add_row(vec![
                Cell::new(number).fg(Color::Yellow),
                Cell::new(from),
                Cell::new(format!("→ {}", to)).fg(to_color),
            ]);
        } else {
            table.add_row(vec![number, from, format!("→ {}", to)]);
        }
    }

    let footer = format!("{} files, {} changes", plan.len(), plan.changes());
    if use_color {
        table.add_row(vec![
            Cell::new("TOTALS").fg(Color::Cyan),
            Cell::new(footer).fg(Color::White),
            Cell::new(&plan.directory).fg(Color::DarkGrey),
        ]);
    } else {
        table.add_row(vec!["TOTALS".to_string(), footer, plan.directory.clone()]);
    }

    table.to_string()
}
