#![forbid(unsafe_code)]

//! Interpreter configuration.
//!
//! Every field has a default, so a partial TOML or JSON table works.
//! Durations are written as integer milliseconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::complete::COMPLETION_DEBOUNCE;
use crate::history::MAX_HISTORY_LINES;
use crate::vocab::{Vocabulary, normalize_path};

/// Default cap on remembered command literals.
pub const MAX_COMMANDS: usize = 100;
/// Default deadline for the `whoami` lookup.
pub const WHOAMI_TIMEOUT: Duration = Duration::from_secs(10);
/// Default delay between `reboot` output and the reload.
pub const REBOOT_DELAY: Duration = Duration::from_millis(500);
/// Default delay between `exit` output and closing the widget.
pub const EXIT_DELAY: Duration = Duration::from_millis(300);

/// Browser details printed by `uname`, supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostInfo {
    pub platform: String,
    pub user_agent: String,
    pub language: String,
}

impl Default for HostInfo {
    fn default() -> Self {
        Self {
            platform: "unknown".into(),
            user_agent: "unknown".into(),
            language: "en-US".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub user: String,
    pub host: String,
    /// Accepted by `su`. Illustrative only.
    pub root_password: String,
    /// Welcome lines shown on mount, never persisted.
    pub banner: Vec<String>,
    pub github_url: String,
    pub blog_route: String,
    pub max_history_lines: usize,
    pub max_commands: usize,
    #[serde(with = "pterm_core::serde_millis")]
    pub completion_debounce: Duration,
    #[serde(with = "pterm_core::serde_millis")]
    pub whoami_timeout: Duration,
    #[serde(with = "pterm_core::serde_millis")]
    pub reboot_delay: Duration,
    #[serde(with = "pterm_core::serde_millis")]
    pub exit_delay: Duration,
    pub vocabulary: Vocabulary,
    pub host_info: HostInfo,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            user: "guest".into(),
            host: "portfolio".into(),
            root_password: "password".into(),
            banner: vec![
                "Welcome to the portfolio terminal.".into(),
                "Type 'help' to see available commands.".into(),
            ],
            github_url: "https://github.com/pterm-dev".into(),
            blog_route: "/blog".into(),
            max_history_lines: MAX_HISTORY_LINES,
            max_commands: MAX_COMMANDS,
            completion_debounce: COMPLETION_DEBOUNCE,
            whoami_timeout: WHOAMI_TIMEOUT,
            reboot_delay: REBOOT_DELAY,
            exit_delay: EXIT_DELAY,
            vocabulary: Vocabulary::default(),
            host_info: HostInfo::default(),
        }
    }
}

impl ShellConfig {
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>, host: impl Into<String>) -> Self {
        self.user = user.into();
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_root_password(mut self, password: impl Into<String>) -> Self {
        self.root_password = password.into();
        self
    }

    #[must_use]
    pub fn with_banner<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.banner = lines.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_max_history_lines(mut self, lines: usize) -> Self {
        self.max_history_lines = lines;
        self
    }

    #[must_use]
    pub fn with_whoami_timeout(mut self, timeout: Duration) -> Self {
        self.whoami_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Returns a list of problems. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.user.is_empty() || self.host.is_empty() {
            errors.push("shell.user and shell.host must not be empty".into());
        }
        if self.max_history_lines == 0 {
            errors.push("shell.max_history_lines must be > 0".into());
        }
        if self.max_commands == 0 {
            errors.push("shell.max_commands must be > 0".into());
        }
        if self.whoami_timeout.is_zero() {
            errors.push("shell.whoami_timeout must be > 0".into());
        }
        if !self.vocabulary.has_route(&normalize_path(&self.blog_route)) {
            errors.push(format!(
                "shell.blog_route {:?} is not a known route",
                self.blog_route
            ));
        }
        errors
    }
}
