use thiserror::Error;

/// Error type that captures attendance storage, configuration and export failures.
///
/// Domain validation (blank names, non-positive hours, unknown ids) never produces an error:
/// those operations are declined and reported through `Option` returns instead.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Export failed: {0}")]
    Export(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Subject not found: {0}")]
    SubjectNotFound(String),
    #[error("Holiday not found: {0}")]
    HolidayNotFound(String),
}

pub type Result<T> = std::result::Result<T, AttendanceError>;

impl From<std::io::Error> for AttendanceError {
    fn from(err: std::io::Error) -> Self {
        AttendanceError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AttendanceError {
    fn from(err: serde_json::Error) -> Self {
        AttendanceError::Storage(err.to_string())
    }
}

/// Errors surfaced by the interactive shell itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] AttendanceError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}
