//! # Verdict Diagnostics
//!
//! This module defines the single, `miette`-based error type for the crate.
//!
//! Only two kinds of failure exist in the normalization pipeline:
//!
//! - **Defaulted metadata** (bad priority literal, missing description, odd
//!   timeout) is never an error. The normalizer resolves it to a documented
//!   default and moves on.
//! - **Contract violations** (the host reports an outcome status outside the
//!   mapped set) abort normalization with [`VerdictError::UnrecognizedStatus`].
//!
//! The remaining variants belong to the outer surfaces: configuration loading
//! and the snapshot files read by the CLI.
//!
//! # Error Construction
//!
//! Use `err_msg!` for the message-only variants:
//!   - `err_msg!(Config, "label width must be positive")`
//!   - `err_msg!(Config, "unknown report format '{}'", raw)`

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Coarse classification of a [`VerdictError`], handy for assertions and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// The host framework reported an outcome this crate does not map.
    Contract,
    /// Invalid configuration value or file.
    Config,
    /// Unreadable or malformed snapshot input.
    Snapshot,
    /// Underlying I/O failure.
    Io,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Contract => "Contract",
            ErrorType::Config => "Config",
            ErrorType::Snapshot => "Snapshot",
            ErrorType::Io => "Io",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type for every failure mode of the crate.
#[derive(Debug, Error, Diagnostic)]
pub enum VerdictError {
    #[error("unrecognized test outcome status '{status}'")]
    #[diagnostic(
        code(verdict::contract::unrecognized_status),
        help("expected one of: Passed, Failed, Skipped, Warning, Inconclusive")
    )]
    UnrecognizedStatus { status: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(verdict::config))]
    Config { message: String },

    #[error("Invalid snapshot '{}': {message}", path.display())]
    #[diagnostic(code(verdict::snapshot))]
    Snapshot { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(verdict::io))]
    Io(#[from] std::io::Error),
}

impl VerdictError {
    /// Returns the classification of this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            VerdictError::UnrecognizedStatus { .. } => ErrorType::Contract,
            VerdictError::Config { .. } => ErrorType::Config,
            VerdictError::Snapshot { .. } => ErrorType::Snapshot,
            VerdictError::Io(_) => ErrorType::Io,
        }
    }

    pub fn snapshot(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        VerdictError::Snapshot {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VerdictError>;

/// Constructs a message-only `VerdictError` variant with a formatted message.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $msg:expr, $($arg:expr),+ $(,)?) => {
        $crate::VerdictError::$variant {
            message: format!($msg, $($arg),+),
        }
    };
    ($variant:ident, $msg:expr) => {
        $crate::VerdictError::$variant {
            message: format!("{}", $msg),
        }
    };
}
