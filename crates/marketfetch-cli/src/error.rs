use marketfetch_core::{SourceError, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
///
/// The `Display` text is what lands in the `{"error": ...}` document.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid arguments")]
    InvalidArguments,

    #[error("{}", missing_arguments_message(.command))]
    MissingArguments { command: String },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Every failure exits with 1; callers only distinguish success from failure.
    pub const fn exit_code(&self) -> u8 {
        1
    }
}

fn missing_arguments_message(command: &str) -> String {
    match command {
        "search" => String::from("Missing query for search command"),
        other => format!("Missing arguments for {other} command"),
    }
}
