use colored::Colorize;

use crate::cli::core::{
    confirmation, expect_args, parse_number, short_id, take_assume_yes, CommandError,
    CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::{SubjectFigures, SubjectStatus};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "subjects",
            "List subjects with their attendance figures",
            "subjects",
            cmd_subjects,
        ),
        CommandEntry::new(
            "add-subject",
            "Add a subject with its weekly hours",
            "add-subject <name> <hours-per-week>",
            cmd_add_subject,
        ),
        CommandEntry::new(
            "remove-subject",
            "Remove a subject",
            "remove-subject <subject>",
            cmd_remove_subject,
        ),
        CommandEntry::new(
            "attend",
            "Record one attended hour",
            "attend <subject>",
            cmd_attend,
        ),
        CommandEntry::new("miss", "Record one missed hour", "miss <subject>", cmd_miss),
        CommandEntry::new(
            "reset-subject",
            "Clear a subject's attended and missed hours",
            "reset-subject <subject> [--yes]",
            cmd_reset_subject,
        ),
    ]
}

fn cmd_subjects(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let figures = context.tracker.all_subject_figures();
    if figures.is_empty() {
        io::print_info("No subjects yet. Use `add-subject <name> <hours>` to add one.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Subject").truncate_at(24),
        TableColumn::right("Hrs/wk"),
        TableColumn::right("Actual"),
        TableColumn::right("Attended"),
        TableColumn::right("Missed"),
        TableColumn::right("Remaining"),
        TableColumn::right("Attendance"),
        TableColumn::right("Can skip"),
        TableColumn::left("Status"),
    ]);
    for fig in &figures {
        table.push_row(vec![
            short_id(fig.subject_id),
            fig.name.clone(),
            format!("{}", fig.hours_per_week),
            format!("{:.1}", fig.actual_hours),
            fig.attended.to_string(),
            fig.missed.to_string(),
            format!("{:.1}", fig.remaining_hours),
            format!("{:.1}%", fig.attendance_percentage),
            fig.skip_budget_remaining.to_string(),
            status_label(fig),
        ]);
    }
    output::section("Subjects");
    output::raw(table.render());
    Ok(())
}

fn status_label(fig: &SubjectFigures) -> String {
    let colour = output::current_preferences().color_enabled;
    match fig.status() {
        SubjectStatus::BelowThreshold if colour => "below target".red().to_string(),
        SubjectStatus::BelowThreshold => "below target".into(),
        SubjectStatus::LowSkipBudget if colour => "low skip budget".yellow().to_string(),
        SubjectStatus::LowSkipBudget => "low skip budget".into(),
        SubjectStatus::OnTrack if colour => "on track".green().to_string(),
        SubjectStatus::OnTrack => "on track".into(),
    }
}

fn cmd_add_subject(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, 2, "add-subject <name> <hours-per-week>")?;
    let hours = parse_number(args[1], "hours per week")?;
    if context.tracker.add_subject(args[0], hours).is_none() {
        return Err(CommandError::InvalidArguments(
            "subject name must not be blank and hours per week must be positive".into(),
        ));
    }
    Ok(())
}

fn cmd_remove_subject(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, 1, "remove-subject <subject>")?;
    let id = context.resolve_subject(args[0])?;
    context.tracker.remove_subject(id);
    Ok(())
}

fn cmd_attend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, 1, "attend <subject>")?;
    let id = context.resolve_subject(args[0])?;
    context.tracker.record_attended(id);
    Ok(())
}

fn cmd_miss(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, 1, "miss <subject>")?;
    let id = context.resolve_subject(args[0])?;
    context.tracker.record_missed(id);
    Ok(())
}

fn cmd_reset_subject(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (rest, assume_yes) = take_assume_yes(args);
    expect_args(&rest, 1, 1, "reset-subject <subject> [--yes]")?;
    let id = context.resolve_subject(rest[0])?;

    let can_reset = context
        .tracker
        .subject_figures(id)
        .map(|fig| fig.can_reset())
        .unwrap_or(false);
    if !can_reset {
        io::print_info("Nothing to reset.");
        return Ok(());
    }

    let gate = confirmation(context.mode, &context.theme, assume_yes);
    if !context.tracker.reset_subject(id, &gate) {
        io::print_info("Reset cancelled.");
    }
    Ok(())
}
