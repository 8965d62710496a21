#![forbid(unsafe_code)]

//! Capabilities the embedding page provides.

use std::time::Duration;

use pterm_shell::{HostInfo, Theme};

/// Page-side collaborators of the widget.
///
/// Every method is fire-and-forget. Results that arrive later (the IP
/// lookup, animation frames, route changes) come back as
/// [`TerminalEvent`](crate::TerminalEvent)s.
pub trait Host {
    /// Client-side navigation to `path`.
    fn navigate(&mut self, path: &str);

    fn current_path(&self) -> String;

    /// Open an external link in a new tab.
    fn open_url(&mut self, url: &str);

    fn theme(&self) -> Theme;

    fn set_theme(&mut self, theme: Theme);

    fn host_info(&self) -> HostInfo {
        HostInfo::default()
    }

    /// Start the public IP lookup. Answer with `IpResolved` or `IpFailed`
    /// carrying the same `request_id`.
    fn start_ip_lookup(&mut self, request_id: u64, timeout: Duration);

    fn cancel_ip_lookup(&mut self, request_id: u64);

    /// Full page reload.
    fn reload(&mut self);

    /// The widget was closed.
    fn close_widget(&mut self) {}

    /// Deliver one `AnimationFrame` event on the next display frame.
    fn request_animation_frame(&mut self);
}
