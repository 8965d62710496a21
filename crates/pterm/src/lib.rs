#![forbid(unsafe_code)]

//! pterm public facade crate.
//!
//! Re-exports the types an embedding host needs from the internal crates and
//! offers a small prelude. Mount a [`TerminalWidget`] with a [`Host`] and a
//! [`StorageBackend`], then feed it [`TerminalEvent`]s.

// --- Core re-exports -------------------------------------------------------

pub use pterm_core::{Clock, Cmd, DeterministicClock, Model, MonotonicClock, Point, Rect, Size};

// --- Window re-exports -----------------------------------------------------

pub use pterm_window::{
    ResizeDirection, WindowAction, WindowConstraints, WindowGeometry, WindowManager,
};

// --- Shell re-exports ------------------------------------------------------

pub use pterm_shell::{
    ErrorKind, History, HistoryEntry, HostInfo, Interpreter, PromptMode, ShellAction,
    ShellConfig, ShellEffect, ShellError, Theme, Vocabulary,
};

// --- Session re-exports ----------------------------------------------------

#[cfg(feature = "file-storage")]
pub use pterm_session::FileStorage;
pub use pterm_session::{
    MemoryStorage, SessionBridge, SessionSnapshot, StorageBackend, StorageError,
};

// --- Host adapter re-exports -----------------------------------------------

#[cfg(feature = "http-lookup")]
pub use pterm_web::{HttpIpLookup, LookupError};
pub use pterm_web::{ConfigError, Host, Key, TerminalConfig, TerminalEvent, TerminalWidget};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for pterm hosts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Standard result type for pterm APIs.
pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::{
        Error, Host, Key, MemoryStorage, Point, ResizeDirection, Result, Size, StorageBackend,
        TerminalConfig, TerminalEvent, TerminalWidget, Theme,
    };

    pub use crate::{core, session, shell, web, window};
}

pub use pterm_core as core;
pub use pterm_session as session;
pub use pterm_shell as shell;
pub use pterm_web as web;
pub use pterm_window as window;
