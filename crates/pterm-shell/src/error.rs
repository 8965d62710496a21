#![forbid(unsafe_code)]

//! User-visible failures of the interpreter.
//!
//! None of these are fatal. Each one becomes an error entry in the history
//! and the interpreter goes straight back to idle.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failed command, rendered as an error history entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("{command}: command not found")]
    UnknownCommand { command: String },
    #[error("{command}: missing argument")]
    MissingArgument { command: String },
    #[error("cd: no such route: {path}")]
    UnknownRoute { path: String },
    #[error("whoami: lookup timed out after {}s", timeout.as_secs())]
    NetworkTimeout { timeout: Duration },
    #[error("whoami: lookup failed: {reason}")]
    NetworkFailure { reason: String },
    #[error("su: Authentication failure")]
    AuthFailure,
}

/// Serializable tag identifying a [`ShellError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownCommand,
    MissingArgument,
    UnknownRoute,
    NetworkTimeout,
    NetworkFailure,
    AuthFailure,
}

impl ShellError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownCommand { .. } => ErrorKind::UnknownCommand,
            Self::MissingArgument { .. } => ErrorKind::MissingArgument,
            Self::UnknownRoute { .. } => ErrorKind::UnknownRoute,
            Self::NetworkTimeout { .. } => ErrorKind::NetworkTimeout,
            Self::NetworkFailure { .. } => ErrorKind::NetworkFailure,
            Self::AuthFailure => ErrorKind::AuthFailure,
        }
    }
}
