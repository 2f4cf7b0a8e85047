//! Error types and exit codes for rcc
//!
//! Exit codes:
//! - 0: Success
//! - 1: Internal failure (compile failure, filesystem/config errors, unknown permanent,
//!   program killed by a signal)
//! - 2: Usage error (bad flags/args)
//!
//! A program run through rcc propagates its own exit status instead of these.

mod macros;

use std::path::PathBuf;
use thiserror::Error;

use crate::template::PLACEHOLDERS;

/// Exit codes returned by rcc itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during rcc operations
#[derive(Error, Debug)]
pub enum RccError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    // Installation errors: never retried, the message tells the user how to repair
    #[error("{what} does not exist: {path:?}\nPlease run `rcc init` to (re)install rcc.")]
    Installation { what: String, path: PathBuf },

    #[error("{}", template_mismatch_message(.path, .found))]
    TemplatePlaceholders { path: PathBuf, found: Vec<usize> },

    #[error("unsupported compiler: {name} (supported: g++, gcc, clang++, clang)")]
    UnsupportedCompiler { name: String },

    #[error("permanent '{name}' does not exist{}", suggestion_suffix(.suggestion))]
    PermanentNotFound {
        name: String,
        suggestion: Option<String>,
    },

    #[error("the binary of permanent '{name}' does not exist, likely due to an earlier compilation failure")]
    PermanentBuildFailed { name: String },

    #[error("failed to run {program:?}: {reason}")]
    Spawn { program: String, reason: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(", did you mean '{}'?", s),
        None => ".".to_string(),
    }
}

fn template_mismatch_message(path: &std::path::Path, found: &[usize]) -> String {
    let mut msg = format!(
        "template {:?} must contain each placeholder exactly once:",
        path
    );
    for (placeholder, count) in PLACEHOLDERS.iter().zip(found) {
        msg.push_str(&format!("\n  {} (found {})", placeholder.marker(), count));
    }
    msg.push_str("\nPlease run `rcc init --force` to reinstall the template.");
    msg
}

impl RccError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        RccError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        RccError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a missing installed asset
    pub fn installation(what: &str, path: impl Into<PathBuf>) -> Self {
        RccError::Installation {
            what: what.to_string(),
            path: path.into(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RccError::UsageError(_) => ExitCode::Usage,

            RccError::Installation { .. }
            | RccError::TemplatePlaceholders { .. }
            | RccError::UnsupportedCompiler { .. }
            | RccError::PermanentNotFound { .. }
            | RccError::PermanentBuildFailed { .. }
            | RccError::Spawn { .. }
            | RccError::Io(_)
            | RccError::Toml(_)
            | RccError::InvalidValue { .. }
            | RccError::FailedOperation { .. }
            | RccError::FailedOperationWithTarget { .. }
            | RccError::Other(_) => ExitCode::Failure,
        }
    }
}

/// Result type alias for rcc operations
pub type Result<T> = std::result::Result<T, RccError>;
