use crate::cli::core::{
    expect_args, parse_date, parse_number, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

const TERM_USAGE: &str = "term [<start> <end> | start <date> | end <date>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "term",
            "Show or set the term dates",
            TERM_USAGE,
            cmd_term,
        ),
        CommandEntry::new(
            "threshold",
            "Show or set the minimum attendance percentage",
            "threshold [<pct>]",
            cmd_threshold,
        ),
    ]
}

fn cmd_term(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 0, 2, TERM_USAGE)?;
    match args {
        [] => {
            let state = context.tracker.state();
            io::print_info(format!(
                "Term: {} to {} ({} weeks)",
                state.term.start_date,
                state.term.end_date,
                state.total_weeks()
            ));
            Ok(())
        }
        ["start", date] => {
            let start = parse_date(date)?;
            context.tracker.set_term_start(start);
            Ok(())
        }
        ["end", date] => {
            let end = parse_date(date)?;
            context.tracker.set_term_end(end);
            Ok(())
        }
        [start, end] => {
            let start = parse_date(start)?;
            let end = parse_date(end)?;
            context.tracker.set_term(start, end);
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(format!("usage: {}", TERM_USAGE))),
    }
}

fn cmd_threshold(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 0, 1, "threshold [<pct>]")?;
    let Some(raw) = args.first() else {
        io::print_info(format!(
            "Minimum attendance: {}%",
            context.tracker.state().min_attendance
        ));
        return Ok(());
    };
    let pct = parse_number(raw.trim_end_matches('%'), "percentage")?;
    if !context.tracker.set_min_attendance(pct) {
        return Err(CommandError::InvalidArguments(
            "minimum attendance must be between 0 and 100".into(),
        ));
    }
    Ok(())
}
