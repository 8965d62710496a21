#![forbid(unsafe_code)]

//! Command Interpreter for the pterm terminal widget.
//!
//! # Key Components
//!
//! - [`Interpreter`] - Reducer owning the input line, scrollback, and privilege flag
//! - [`History`] - Scrollback capped in displayed lines
//! - [`Completer`] - Tab completion with debounced cycling
//! - [`ShellError`] - User-visible failures, rendered as error entries
//! - [`ShellConfig`] - Names, vocabularies, limits, and delays
//!
//! The interpreter never performs I/O. Navigation, theme changes, the IP
//! lookup, session writes, and reloads come back as [`ShellEffect`] values.

pub mod command;
pub mod complete;
pub mod config;
pub mod error;
pub mod history;
pub mod interpreter;
pub mod vocab;

pub use command::{Builtin, Invocation};
pub use complete::{
    COMPLETION_DEBOUNCE, Completer, Completion, CompletionKind, inline_suggestion,
    longest_common_prefix,
};
pub use config::{EXIT_DELAY, HostInfo, MAX_COMMANDS, REBOOT_DELAY, ShellConfig, WHOAMI_TIMEOUT};
pub use error::{ErrorKind, ShellError};
pub use history::{EntryId, History, HistoryEntry, MAX_HISTORY_LINES};
pub use interpreter::{Interpreter, PromptMode, ShellAction, ShellEffect, Theme};
pub use vocab::{Route, Vocabulary, normalize_path};
