#![forbid(unsafe_code)]

//! Headless reference host for the pterm widget.
//!
//! Reads one line at a time from stdin. Plain lines are typed into the
//! terminal and submitted; `:`-prefixed directives drive the window chrome
//! and the virtual clock:
//!
//! ```text
//! :drag DX DY          :resize HANDLE DX DY   :viewport W H
//! :minimize  :open     :maximize  :close      :geometry
//! :tab [TEXT]  :up  :down  :ctrl-c  :screen   :wait MS   :quit
//! ```
//!
//! The scrollback is printed as it grows. Host calls (navigation, theme
//! changes, reloads) appear in brackets.

pub mod cli;
pub mod error;
pub mod host;
pub mod render;
pub mod runner;
pub mod script;

pub use cli::{Cli, run, run_from_env};
pub use error::{HarnessError, Result};
pub use host::HeadlessHost;
pub use runner::Runner;
