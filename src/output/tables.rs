use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::workflows::Diagnostic;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

/// Kind label for a diagnostic, colored by how much output it cost.
pub fn diagnostic_kind_cell(diagnostic: &Diagnostic) -> Cell {
    match diagnostic {
        Diagnostic::MissingWorkflowsDirectory { .. } => {
            Cell::new("missing directory").fg(TableColor::Yellow)
        }
        Diagnostic::ParseFailure { .. } => Cell::new("parse failure").fg(TableColor::Red),
        Diagnostic::ReusableWorkflowNotFound { .. } => {
            Cell::new("not found").fg(TableColor::Yellow)
        }
        Diagnostic::ReusableWorkflowCycle { .. } => Cell::new("cycle").fg(TableColor::Red),
        Diagnostic::MaxDepthExceeded { .. } => Cell::new("too deep").fg(TableColor::Red),
    }
}
