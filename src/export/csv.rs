//! Delimited-values rendering of report rows.

use crate::core::report::{ReportRow, REPORT_COLUMNS};

/// Renders a header line followed by one line per row. No trailing newline.
pub fn render_csv(rows: &[ReportRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        REPORT_COLUMNS
            .iter()
            .map(|title| escape_field(title))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        lines.push(
            row.cells()
                .iter()
                .map(|cell| escape_field(cell))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

/// Quotes fields containing a comma, quote or newline, doubling embedded quotes.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
