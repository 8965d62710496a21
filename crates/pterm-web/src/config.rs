#![forbid(unsafe_code)]

//! Widget configuration.
//!
//! # Loading
//!
//! ```toml
//! # pterm.toml
//! session_key = "pterm.session"
//!
//! [shell]
//! user = "guest"
//! whoami_timeout = 10000
//!
//! [window]
//! min_visible_area = 120
//! ```
//!
//! ```rust,ignore
//! let config = TerminalConfig::from_toml_file("pterm.toml")?;
//! let config = TerminalConfig::from_json_str(json)?;
//! ```
//!
//! Every field has a default, so `TerminalConfig::default()` is a working
//! configuration and partial files only override what they name.

use std::path::Path;

use pterm_session::SESSION_KEY;
use pterm_shell::ShellConfig;
use pterm_window::WindowConstraints;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default endpoint for the `whoami` lookup.
pub const IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub shell: ShellConfig,
    pub window: WindowConstraints,
    /// Key of the session snapshot in host storage.
    pub session_key: String,
    /// Endpoint answering `{"ip": "..."}`.
    pub ip_lookup_url: String,
    /// Hold delayed effects until their time comes. When off, reload and
    /// close run immediately.
    pub schedule_delays: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            shell: ShellConfig::default(),
            window: WindowConstraints::default(),
            session_key: SESSION_KEY.into(),
            ip_lookup_url: IP_LOOKUP_URL.into(),
            schedule_delays: true,
        }
    }
}

/// Errors raised while loading a [`TerminalConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config-file")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl TerminalConfig {
    #[must_use]
    pub fn with_shell(mut self, shell: ShellConfig) -> Self {
        self.shell = shell;
        self
    }

    #[must_use]
    pub fn with_window(mut self, window: WindowConstraints) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    #[must_use]
    pub fn with_schedule_delays(mut self, enabled: bool) -> Self {
        self.schedule_delays = enabled;
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load by extension: `.toml` needs the `config-file` feature, anything
    /// else is read as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        #[cfg(feature = "config-file")]
        {
            if path.extension().is_some_and(|ext| ext == "toml") {
                return Self::from_toml_file(path);
            }
        }
        Self::from_json_file(path)
    }

    /// Returns a list of problems. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.shell.validate();
        errors.extend(self.window.validate());
        if self.session_key.is_empty() {
            errors.push("session_key must not be empty".into());
        }
        if !self.ip_lookup_url.starts_with("http://") && !self.ip_lookup_url.starts_with("https://")
        {
            errors.push(format!(
                "ip_lookup_url must be an http(s) URL, got {:?}",
                self.ip_lookup_url
            ));
        }
        errors
    }

    /// `self` if valid, otherwise every problem found.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}
