#![forbid(unsafe_code)]

//! Host events delivered to the widget.

use std::time::Duration;

use pterm_core::{Point, Size};
use pterm_shell::Theme;
use pterm_window::ResizeDirection;

/// Keys the terminal reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Tab,
    Up,
    Down,
    Escape,
    CtrlC,
    CtrlL,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    Key { key: Key, now: Duration },
    /// Replace the input line (paste, IME commit).
    SetInput(String),
    TitleBarPointerDown(Point),
    TitleBarDoubleClick,
    ResizeHandlePointerDown(ResizeDirection, Point),
    PointerMove(Point),
    PointerUp,
    AnimationFrame,
    MinimizeButton,
    MaximizeButton,
    CloseButton,
    /// Launcher clicked: open or un-minimize the widget.
    Open,
    ViewportResized(Size),
    /// Host clock advanced; runs due delayed effects and lookup deadlines.
    Tick(Duration),
    IpResolved { request_id: u64, ip: String },
    IpFailed { request_id: u64, reason: String },
    RouteChanged(String),
    ThemeChanged(Theme),
}

impl TerminalEvent {
    #[must_use]
    pub const fn key(key: Key, now: Duration) -> Self {
        Self::Key { key, now }
    }

    /// Host time carried by the event, if any.
    #[must_use]
    pub const fn time(&self) -> Option<Duration> {
        match self {
            Self::Key { now, .. } | Self::Tick(now) => Some(*now),
            _ => None,
        }
    }
}
