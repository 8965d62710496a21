#![forbid(unsafe_code)]

//! Host adapter for the pterm terminal widget.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page pushes input, pointer, and
//!   clock events through [`TerminalWidget::handle`].
//! - **Deterministic time**: every timed behaviour keys off the times the
//!   host passes in, never the wall clock.
//! - **No threads**: the only asynchronous work, the IP lookup, is started
//!   by the host and answered with an event.
//!
//! # Feature Flags
//!
//! - `config-file`: TOML loading for [`TerminalConfig`]
//! - `file-storage`: re-exports the JSON file session backend
//! - `http-lookup`: [`HttpIpLookup`] on blocking `reqwest`

pub mod config;
pub mod event;
pub mod host;
#[cfg(feature = "http-lookup")]
pub mod lookup;
pub mod widget;

pub use config::{ConfigError, IP_LOOKUP_URL, TerminalConfig};
pub use event::{Key, TerminalEvent};
pub use host::Host;
#[cfg(feature = "http-lookup")]
pub use lookup::{HttpIpLookup, LookupError};
pub use widget::TerminalWidget;
