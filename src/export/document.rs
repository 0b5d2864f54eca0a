//! Paginated plain-text attendance report.

use crate::core::report::{ReportHeader, ReportRow};

pub const DEFAULT_LINES_PER_PAGE: usize = 50;

const REPORT_TITLE: &str = "Semester Attendance Report";
const FOOTER_LABEL: &str = "Semester Attendance Calculator";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lines reserved at the bottom of each page for the footer.
const FOOTER_LINES: usize = 2;

/// Renders the report as pages separated by form feeds.
///
/// Subject entries are never split across pages. `lines_per_page` is raised to fit the largest
/// block when it is too small.
pub fn render_document(header: &ReportHeader, rows: &[ReportRow], lines_per_page: usize) -> String {
    let pages = paginate(header, rows, lines_per_page);
    let total = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(idx, mut page)| {
            page.push(String::new());
            page.push(format!("{FOOTER_LABEL}    Page {} of {}", idx + 1, total));
            page.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\u{c}\n")
}

fn paginate(header: &ReportHeader, rows: &[ReportRow], lines_per_page: usize) -> Vec<Vec<String>> {
    let mut blocks = vec![header_block(header)];
    blocks.extend(rows.iter().enumerate().map(|(idx, row)| subject_block(idx + 1, row)));

    let largest = blocks.iter().map(Vec::len).max().unwrap_or(0);
    let body_capacity = lines_per_page
        .saturating_sub(FOOTER_LINES)
        .max(largest);

    let mut pages: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for block in blocks {
        if !current.is_empty() && current.len() + block.len() > body_capacity {
            pages.push(std::mem::take(&mut current));
        }
        current.extend(block);
    }
    pages.push(current);
    pages
}

fn header_block(header: &ReportHeader) -> Vec<String> {
    vec![
        REPORT_TITLE.to_string(),
        String::new(),
        format!("Generated on: {}", header.generated_on.format(DATE_FORMAT)),
        format!(
            "Semester: {} - {}",
            header.term_start.format(DATE_FORMAT),
            header.term_end.format(DATE_FORMAT)
        ),
        format!("Minimum Attendance: {}%", header.min_attendance),
        String::new(),
        "Overall Statistics".to_string(),
        format!("  Overall Attendance: {}%", header.overall_percentage),
        format!("  Total Hours Attended: {}", header.total_attended),
        format!("  Total Hours Missed: {}", header.total_missed),
        String::new(),
        "Subject Details".to_string(),
    ]
}

fn subject_block(position: usize, row: &ReportRow) -> Vec<String> {
    let cells = row.cells();
    vec![
        format!("{}. {}", position, row.subject),
        format!("   Hours Per Week: {}", cells[1]),
        format!(
            "   Scheduled Hours: {} | Cancelled: {} | Actual: {}",
            cells[3], cells[4], cells[5]
        ),
        format!(
            "   Attended: {} hrs | Missed: {} hrs | Remaining: {} hrs",
            cells[6], cells[7], cells[8]
        ),
        format!(
            "   Attendance: {}% | Allowed Absences: {} hrs | Can Still Skip: {} hrs",
            cells[9], cells[10], cells[11]
        ),
        String::new(),
    ]
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn header() -> ReportHeader {
        ReportHeader {
            generated_on: NaiveDate::from_ymd_opt(2025, 10, 15).unwrap(),
            term_start: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            term_end: NaiveDate::from_ymd_opt(2025, 12, 22).unwrap(),
            min_attendance: 75.0,
            overall_percentage: "85.7".into(),
            total_attended: 30,
            total_missed: 5,
        }
    }

    fn row(subject: &str) -> ReportRow {
        ReportRow {
            subject: subject.to_string(),
            hours_per_week: 3.0,
            total_weeks: 16,
            scheduled_hours: 48.0,
            cancelled_hours: 6.0,
            actual_hours: 42.0,
            attended: 30,
            missed: 5,
            remaining_hours: 7.0,
            attendance_percentage: "85.71".into(),
            allowed_absences: 10,
            skip_budget_remaining: 5,
        }
    }

    #[test]
    fn single_page_report_has_header_and_footer() {
        let doc = render_document(&header(), &[row("Math")], DEFAULT_LINES_PER_PAGE);
        assert!(doc.starts_with(REPORT_TITLE));
        assert!(doc.contains("Semester: 2025-09-01 - 2025-12-22"));
        assert!(doc.contains("Minimum Attendance: 75%"));
        assert!(doc.contains("1. Math"));
        assert!(doc.contains(
            "Attendance: 85.71% | Allowed Absences: 10 hrs | Can Still Skip: 5 hrs"
        ));
        assert!(doc.ends_with("Page 1 of 1"));
    }

    #[test]
    fn subjects_flow_onto_new_pages_without_splitting() {
        let rows: Vec<_> = (0..10).map(|i| row(&format!("Subject {i}"))).collect();
        let doc = render_document(&header(), &rows, 20);
        let pages: Vec<_> = doc.split('\u{c}').collect();
        assert!(pages.len() > 1);
        let total = pages.len();
        for (idx, page) in pages.iter().enumerate() {
            assert!(page.trim_end().ends_with(&format!("Page {} of {}", idx + 1, total)));
            assert!(page.lines().count() <= 21);
        }
        for i in 0..10 {
            let entry = format!("{}. Subject {}", i + 1, i);
            let page = pages.iter().find(|p| p.contains(&entry)).expect("entry rendered");
            assert!(page.contains(&format!("{entry}\n   Hours Per Week: 3")));
        }
    }

    #[test]
    fn empty_report_is_one_page() {
        let doc = render_document(&header(), &[], DEFAULT_LINES_PER_PAGE);
        assert!(doc.contains("Subject Details"));
        assert!(doc.ends_with("Page 1 of 1"));
    }
}
