//! Error types for compiling and running scripts.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for fallible library operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error for callers that drive both phases.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// A script failed to compile. Compilation is atomic: no instruction from a
/// failed compile is ever executed.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The line names a command the catalog does not know.
    #[error("line {line}: unknown command '{name}'")]
    UnknownCommand { name: String, line: usize },

    /// Parameters do not match the command's arity or type expectations.
    #[error("line {line}: invalid parameters for '{command}': {reason}")]
    InvalidParameters {
        command: String,
        line: usize,
        reason: String,
    },

    /// A control-transfer target could not be found in the script.
    #[error("line {line}: cannot resolve jump target '{name}'")]
    UnresolvedTarget { name: String, line: usize },

    #[error("failed to read script file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    /// The 1-based line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            CompileError::UnknownCommand { line, .. }
            | CompileError::InvalidParameters { line, .. }
            | CompileError::UnresolvedTarget { line, .. } => Some(*line),
            CompileError::Io { .. } => None,
        }
    }
}

/// Errors raised by the command catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("command already registered: {0}")]
    DuplicateCommand(String),
}

/// Failure reported by [`MacroCommand::prepare`](crate::command::MacroCommand::prepare).
///
/// The compiler attaches the command name and line number.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrepareError {
    #[error("{0}")]
    InvalidParameters(String),

    #[error("unresolved target '{0}'")]
    UnresolvedTarget(String),
}

impl PrepareError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        PrepareError::InvalidParameters(reason.into())
    }
}

/// A run stopped because an instruction failed.
#[derive(Debug, Error)]
pub enum RunError {
    /// The effector failed or a command raised an error while executing.
    #[error("line {line}: '{command}' failed: {source}")]
    Effect {
        command: &'static str,
        line: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The worker ended without reporting an outcome (it panicked).
    #[error("script worker aborted: {0}")]
    Aborted(String),
}

/// Errors loading or saving [`Settings`](crate::settings::Settings).
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
