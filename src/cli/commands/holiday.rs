use crate::cli::core::{
    expect_args, parse_date, parse_number, short_id, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::ledger::{subject_name, CancelledHours};

const ADD_USAGE: &str = "add-holiday <name> <start> <end> <subject>=<hours>...";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "holidays",
            "List holidays and the hours they cancel",
            "holidays",
            cmd_holidays,
        ),
        CommandEntry::new(
            "add-holiday",
            "Add a break that cancels hours for some subjects",
            ADD_USAGE,
            cmd_add_holiday,
        ),
        CommandEntry::new(
            "remove-holiday",
            "Remove a holiday",
            "remove-holiday <holiday>",
            cmd_remove_holiday,
        ),
    ]
}

fn cmd_holidays(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let state = context.tracker.state();
    if state.holidays.is_empty() {
        io::print_info("No holidays recorded.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Holiday").truncate_at(24),
        TableColumn::left("Start"),
        TableColumn::left("End"),
        TableColumn::right("Days"),
        TableColumn::right("Hours"),
        TableColumn::left("Cancelled").truncate_at(48),
    ]);
    for holiday in state.holidays.iter() {
        let cancelled: Vec<String> = holiday
            .cancelled_hours
            .iter()
            .map(|(id, hours)| format!("{} {}h", subject_name(&state.subjects, id), hours))
            .collect();
        table.push_row(vec![
            short_id(holiday.id),
            holiday.name.clone(),
            holiday.start_date.to_string(),
            holiday.end_date.to_string(),
            holiday.duration_days().to_string(),
            format!("{}", holiday.total_hours()),
            cancelled.join(", "),
        ]);
    }
    output::section("Holidays");
    output::raw(table.render());
    Ok(())
}

fn cmd_add_holiday(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 4 {
        return Err(CommandError::InvalidArguments(format!("usage: {}", ADD_USAGE)));
    }
    let start = parse_date(args[1])?;
    let end = parse_date(args[2])?;

    let mut entries = Vec::with_capacity(args.len() - 3);
    for pair in &args[3..] {
        let (subject, hours) = pair.rsplit_once('=').ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "expected <subject>=<hours>, got `{}`",
                pair
            ))
        })?;
        let id = context.resolve_subject(subject)?;
        entries.push((id, parse_number(hours, "hours")?));
    }

    let cancelled = CancelledHours::from_entries(entries);
    if context
        .tracker
        .add_holiday(args[0], start, end, cancelled)
        .is_none()
    {
        return Err(CommandError::InvalidArguments(
            "holiday needs a name and at least one subject with positive hours".into(),
        ));
    }
    Ok(())
}

fn cmd_remove_holiday(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, 1, "remove-holiday <holiday>")?;
    let id = context.resolve_holiday(args[0])?;
    context.tracker.remove_holiday(id);
    Ok(())
}
