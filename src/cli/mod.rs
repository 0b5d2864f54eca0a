pub mod commands;
pub mod core;
mod help;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
mod shell_context;
pub mod table;

pub use self::core::{CliError, CliMode, CommandError, ShellContext};
pub use shell::run_cli;
