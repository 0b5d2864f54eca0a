//! Report renderers. Both formats are driven from the same row set.

pub mod csv;
pub mod document;

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::NaiveDate;

use crate::{
    core::report::{ReportHeader, ReportRow},
    errors::{AttendanceError, Result},
    utils::fs::write_atomic,
};

pub use self::csv::render_csv;
pub use document::{render_document, DEFAULT_LINES_PER_PAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Csv,
    Report,
}

impl ExportKind {
    pub fn extension(self) -> &'static str {
        match self {
            ExportKind::Csv => "csv",
            ExportKind::Report => "txt",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportKind::Csv => "CSV",
            ExportKind::Report => "Report",
        }
    }

    pub fn render(self, header: &ReportHeader, rows: &[ReportRow]) -> String {
        match self {
            ExportKind::Csv => render_csv(rows),
            ExportKind::Report => render_document(header, rows, DEFAULT_LINES_PER_PAGE),
        }
    }
}

impl FromStr for ExportKind {
    type Err = AttendanceError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportKind::Csv),
            "report" | "txt" | "pdf" => Ok(ExportKind::Report),
            other => Err(AttendanceError::InvalidInput(format!(
                "unknown export format `{}` (expected csv or report)",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `attendance-report-YYYY-MM-DD.<ext>`
pub fn export_file_name(kind: ExportKind, date: NaiveDate) -> String {
    format!(
        "attendance-report-{}.{}",
        date.format("%Y-%m-%d"),
        kind.extension()
    )
}

/// Writes rendered content into `dir`, returning the file path.
pub fn write_export(
    dir: &Path,
    kind: ExportKind,
    date: NaiveDate,
    content: &str,
) -> Result<PathBuf> {
    let path = dir.join(export_file_name(kind, date));
    write_atomic(&path, content)
        .map_err(|err| AttendanceError::Export(format!("{}: {}", path.display(), err)))?;
    Ok(path)
}
