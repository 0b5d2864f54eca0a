use std::path::{Path, PathBuf};

use dialoguer::theme::ColorfulTheme;
use tracing::warn;

use crate::{
    config::{Config, ConfigManager},
    core::{AttendanceTracker, TrackerDefaults},
    storage::{state_warnings, JsonStorage},
    utils::paths,
};

use super::commands;
use super::core::CliError;
use super::io as cli_io;
use super::output;
use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub tracker: AttendanceTracker,
    pub theme: ColorfulTheme,
    pub config: Config,
    pub base_dir: PathBuf,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Builds a shell over the application data directory, loading config and the last snapshot.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base_dir = paths::app_data_dir();
        let config_manager = ConfigManager::with_base_dir(&base_dir)?;
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    error = %err,
                    path = %config_manager.path().display(),
                    "using default config"
                );
                cli_io::print_warning(format!("{} (using defaults)", err));
                Config::default()
            }
        };

        let data_dir = config.resolve_data_dir(&base_dir);
        let storage = JsonStorage::at_path(paths::snapshot_file_in(&data_dir))?;
        let tracker = AttendanceTracker::open(Box::new(storage), TrackerDefaults::from(&config));

        let mut context = Self::with_tracker(mode, tracker, config, base_dir);
        for warning in state_warnings(context.tracker.state()) {
            cli_io::print_warning(warning);
        }
        context.flush_notifications();
        Ok(context)
    }

    pub fn with_tracker(
        mode: CliMode,
        tracker: AttendanceTracker,
        config: Config,
        base_dir: PathBuf,
    ) -> Self {
        output::apply_config(&config, mode == CliMode::Script);
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        Self {
            mode,
            registry,
            tracker,
            theme: ColorfulTheme::default(),
            config,
            base_dir,
            last_command: None,
            running: true,
        }
    }

    pub fn prompt(&self) -> String {
        let subjects = self.tracker.state().subjects.len();
        match subjects {
            0 => "attendance> ".to_string(),
            n => format!("attendance ({} subjects)> ", n),
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        self.config.resolve_export_dir(&self.base_dir)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
