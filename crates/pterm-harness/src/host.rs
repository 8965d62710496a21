#![forbid(unsafe_code)]

//! A host with no page behind it.
//!
//! Calls are recorded so the runner can act on them between input lines:
//! animation frames are delivered immediately, reloads remount the widget,
//! and lookups are answered (or left to time out) by the runner.

use std::time::Duration;

use pterm::{Host, HostInfo, Theme};

#[derive(Debug, Clone)]
pub struct HeadlessHost {
    path: String,
    theme: Theme,
    /// Lookups started and not yet answered or cancelled.
    pub lookups: Vec<(u64, Duration)>,
    pub frame_requested: bool,
    pub reload_requested: bool,
    /// Human-readable log of host calls, drained by the runner.
    pub notices: Vec<String>,
}

impl HeadlessHost {
    #[must_use]
    pub fn new(path: &str, theme: Theme) -> Self {
        Self {
            path: path.to_owned(),
            theme,
            lookups: Vec::new(),
            frame_requested: false,
            reload_requested: false,
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Host for HeadlessHost {
    fn navigate(&mut self, path: &str) {
        path.clone_into(&mut self.path);
        self.notices.push(format!("navigate {path}"));
    }

    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn open_url(&mut self, url: &str) {
        self.notices.push(format!("open {url}"));
    }

    fn theme(&self) -> Theme {
        self.theme
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.notices.push(format!("theme {theme}"));
    }

    fn host_info(&self) -> HostInfo {
        HostInfo {
            platform: std::env::consts::OS.to_owned(),
            user_agent: concat!("pterm-harness/", env!("CARGO_PKG_VERSION")).to_owned(),
            language: "en-US".to_owned(),
        }
    }

    fn start_ip_lookup(&mut self, request_id: u64, timeout: Duration) {
        self.lookups.push((request_id, timeout));
    }

    fn cancel_ip_lookup(&mut self, request_id: u64) {
        self.lookups.retain(|(id, _)| *id != request_id);
    }

    fn reload(&mut self) {
        self.reload_requested = true;
        self.notices.push("reload".to_owned());
    }

    fn close_widget(&mut self) {
        self.notices.push("closed".to_owned());
    }

    fn request_animation_frame(&mut self) {
        self.frame_requested = true;
    }
}
