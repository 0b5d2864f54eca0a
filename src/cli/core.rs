//! Dispatch, error reporting and argument helpers shared by every command.

use std::io;

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use uuid::Uuid;

use crate::errors::AttendanceError;
pub use crate::errors::CliError;

use super::io as cli_io;
use super::output;
use super::registry::CommandEntry;
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Flag accepted by destructive commands to skip the confirmation prompt.
pub(crate) const ASSUME_YES_FLAG: &str = "--yes";

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] AttendanceError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

impl ShellContext {
    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        let outcome = handler(self, args);
        self.flush_notifications();
        match outcome {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(&err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());
        self.dispatch(&command, raw, &args)
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }

    /// Prints and clears the notifications queued by the tracker.
    pub(crate) fn flush_notifications(&mut self) {
        for note in self.tracker.take_notifications() {
            output::notification(&note);
        }
    }

    /// Resolves a subject by case-insensitive name or id prefix.
    pub(crate) fn resolve_subject(&self, reference: &str) -> Result<Uuid, CommandError> {
        let subjects = &self.tracker.state().subjects;
        if let Some(subject) = subjects.find_by_name(reference) {
            return Ok(subject.id);
        }
        let ids: Vec<Uuid> = subjects.iter().map(|s| s.id).collect();
        match_id_prefix(&ids, reference)?
            .ok_or_else(|| AttendanceError::SubjectNotFound(reference.to_string()).into())
    }

    /// Resolves a holiday by case-insensitive name or id prefix.
    pub(crate) fn resolve_holiday(&self, reference: &str) -> Result<Uuid, CommandError> {
        let holidays = &self.tracker.state().holidays;
        if let Some(holiday) = holidays.find_by_name(reference) {
            return Ok(holiday.id);
        }
        let ids: Vec<Uuid> = holidays.iter().map(|h| h.id).collect();
        match_id_prefix(&ids, reference)?
            .ok_or_else(|| AttendanceError::HolidayNotFound(reference.to_string()).into())
    }
}

/// Confirmation gate for destructive commands. Script mode never prompts, so it only
/// proceeds with an explicit `--yes`.
pub(crate) fn confirmation(
    mode: CliMode,
    theme: &ColorfulTheme,
    assume_yes: bool,
) -> impl Fn(&str) -> bool + '_ {
    move |prompt: &str| {
        if assume_yes {
            return true;
        }
        match mode {
            CliMode::Script => {
                cli_io::print_warning(format!(
                    "{} Re-run with `{}` to confirm.",
                    prompt, ASSUME_YES_FLAG
                ));
                false
            }
            CliMode::Interactive => confirm_or_decline(theme, prompt),
        }
    }
}

fn confirm_or_decline(theme: &ColorfulTheme, prompt: &str) -> bool {
    match cli_io::confirm_action(theme, prompt, false) {
        Ok(answer) => answer,
        Err(err) => {
            tracing::warn!(error = %err, "confirmation prompt failed");
            false
        }
    }
}

fn match_id_prefix(ids: &[Uuid], reference: &str) -> Result<Option<Uuid>, CommandError> {
    let needle = reference.trim().to_ascii_lowercase().replace('-', "");
    if needle.len() < 4 || !needle.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Ok(None);
    }
    let matches: Vec<Uuid> = ids
        .iter()
        .copied()
        .filter(|id| id.simple().to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(*only)),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{}` matches more than one entry; use a longer id prefix",
            reference
        ))),
    }
}

/// Splits trailing `--yes` off the argument list.
pub(crate) fn take_assume_yes<'a>(args: &[&'a str]) -> (Vec<&'a str>, bool) {
    let assume_yes = args.iter().any(|arg| *arg == ASSUME_YES_FLAG);
    let rest = args
        .iter()
        .copied()
        .filter(|arg| *arg != ASSUME_YES_FLAG)
        .collect();
    (rest, assume_yes)
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

pub(crate) fn parse_number(input: &str, what: &str) -> Result<f64, CommandError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid {} `{}`", what, input)))
}

pub(crate) fn expect_args(
    args: &[&str],
    min: usize,
    max: usize,
    usage: &str,
) -> Result<(), CommandError> {
    if args.len() < min || args.len() > max {
        return Err(CommandError::InvalidArguments(format!("usage: {}", usage)));
    }
    Ok(())
}

pub(crate) fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

#[cfg(test)]
pub(crate) fn process_script(
    context: &mut ShellContext,
    lines: &[&str],
) -> Result<(), CliError> {
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}
