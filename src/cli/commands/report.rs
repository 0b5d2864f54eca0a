use std::path::PathBuf;

use crate::cli::core::{expect_args, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::export::ExportKind;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "status",
            "Show overall attendance for the term",
            "status",
            cmd_status,
        ),
        CommandEntry::new(
            "export",
            "Write a CSV or plain-text report",
            "export <csv|report> [dir]",
            cmd_export,
        ),
    ]
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let state = context.tracker.state();
    let totals = context.tracker.aggregate();

    output::section("Overall Statistics");
    io::print_info(format!(
        "  Term          : {} to {} ({} weeks)",
        state.term.start_date,
        state.term.end_date,
        state.total_weeks()
    ));
    io::print_info(format!("  Subjects      : {}", totals.subject_count));
    io::print_info(format!(
        "  Hours         : {:.1} scheduled, {:.1} cancelled, {:.1} actual",
        totals.scheduled_hours, totals.cancelled_hours, totals.actual_hours
    ));
    io::print_info(format!(
        "  Recorded      : {} attended, {} missed, {:.1} remaining",
        totals.attended, totals.missed, totals.remaining_hours
    ));
    io::print_info(format!(
        "  Attendance    : {:.1}% (minimum {}%)",
        totals.attendance_percentage, totals.min_attendance
    ));
    io::print_info(format!(
        "  Absences      : {} allowed, {} can still skip",
        totals.allowed_absences, totals.skip_budget_remaining
    ));
    if totals.attended + totals.missed > 0 && totals.below_target() {
        io::print_warning("Overall attendance is below the minimum.");
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, 2, "export <csv|report> [dir]")?;
    let kind: ExportKind = args[0].parse()?;
    let dir = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| context.export_dir());

    match context.tracker.export(kind, &dir) {
        Ok(path) => io::print_info(format!("Saved to {}", path.display())),
        Err(err) => io::print_hint(err),
    }
    Ok(())
}
