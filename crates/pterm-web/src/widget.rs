#![forbid(unsafe_code)]

//! The mounted terminal widget.
//!
//! [`TerminalWidget`] is the thin adapter between a [`Host`] and the two
//! reducers. It translates [`TerminalEvent`]s into window and shell actions,
//! walks the returned [`Cmd`] trees, and performs each effect against the
//! host or the session bridge. Delayed effects wait in a queue until a
//! [`TerminalEvent::Tick`] reaches their due time, unless
//! [`TerminalConfig::schedule_delays`] is off.

use std::time::Duration;

use pterm_core::{Clock, Cmd, DeterministicClock, Model, Size};
use pterm_session::{SessionBridge, SessionSnapshot, StorageBackend};
use pterm_shell::{Interpreter, ShellAction, ShellEffect};
use pterm_window::{Gesture, WindowAction, WindowEffect, WindowManager};

use crate::config::{ConfigError, TerminalConfig};
use crate::event::{Key, TerminalEvent};
use crate::host::Host;

#[derive(Debug, Clone)]
struct Delayed {
    due: Duration,
    effect: ShellEffect,
}

/// A terminal widget bound to a host page and a session store.
pub struct TerminalWidget<H, S> {
    config: TerminalConfig,
    host: H,
    bridge: SessionBridge<S>,
    shell: Interpreter,
    window: WindowManager,
    clock: DeterministicClock,
    delayed: Vec<Delayed>,
    is_open: bool,
}

impl<H: Host, S: StorageBackend> TerminalWidget<H, S> {
    /// Build the widget and restore a pending session snapshot.
    ///
    /// The widget starts open only when a snapshot was restored.
    pub fn mount(
        config: TerminalConfig,
        host: H,
        storage: S,
        viewport: Size,
        now: Duration,
    ) -> Result<Self, ConfigError> {
        let config = config.validated()?;

        let mut shell = Interpreter::new(config.shell.clone());
        shell.set_host_info(host.host_info());
        shell.set_path(&host.current_path());
        shell.set_theme(host.theme());
        let mut window = WindowManager::new(config.window, viewport);

        let mut bridge = SessionBridge::with_key(storage, config.session_key.clone());
        let restored = match bridge.take_restore() {
            Some(snapshot) => {
                snapshot.apply(&mut shell, &mut window);
                true
            }
            None => false,
        };

        let mut clock = DeterministicClock::new();
        clock.set(now);
        tracing::info!(restored, ?viewport, path = shell.path(), "terminal mounted");

        Ok(Self {
            config,
            host,
            bridge,
            shell,
            window,
            clock,
            delayed: Vec::new(),
            is_open: restored,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        self.bridge.storage()
    }

    #[must_use]
    pub fn shell(&self) -> &Interpreter {
        &self.shell
    }

    #[must_use]
    pub fn window(&self) -> &WindowManager {
        &self.window
    }

    /// Open and not minimized.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.is_open && !self.window.geometry().is_minimized
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Delayed effects not yet due.
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.delayed.len()
    }

    /// Release the host and the session store.
    pub fn into_parts(self) -> (H, S) {
        (self.host, self.bridge.into_storage())
    }

    /// Feed one host event.
    pub fn handle(&mut self, event: TerminalEvent) {
        if let Some(now) = event.time() {
            self.clock.set(now);
        }
        match event {
            TerminalEvent::Key { key, now } => self.on_key(key, now),
            TerminalEvent::SetInput(text) => self.dispatch_shell(ShellAction::Input(text)),
            TerminalEvent::TitleBarPointerDown(p) => self.dispatch_window(WindowAction::BeginDrag(p)),
            TerminalEvent::TitleBarDoubleClick | TerminalEvent::MaximizeButton => {
                self.dispatch_window(WindowAction::ToggleMaximize);
            }
            TerminalEvent::ResizeHandlePointerDown(direction, p) => {
                self.dispatch_window(WindowAction::BeginResize(direction, p));
            }
            TerminalEvent::PointerMove(p) => match self.window.gesture() {
                Gesture::Dragging { .. } => self.dispatch_window(WindowAction::UpdateDrag(p)),
                Gesture::Resizing { .. } => self.dispatch_window(WindowAction::UpdateResize(p)),
                Gesture::Idle => {}
            },
            TerminalEvent::PointerUp => match self.window.gesture() {
                Gesture::Dragging { .. } => self.dispatch_window(WindowAction::EndDrag),
                Gesture::Resizing { .. } => self.dispatch_window(WindowAction::EndResize),
                Gesture::Idle => {}
            },
            TerminalEvent::AnimationFrame => self.dispatch_window(WindowAction::AnimationFrame),
            TerminalEvent::MinimizeButton => self.minimize(),
            TerminalEvent::CloseButton => self.close(),
            TerminalEvent::Open => self.open(),
            TerminalEvent::ViewportResized(size) => {
                self.dispatch_window(WindowAction::ViewportResized(size));
            }
            TerminalEvent::Tick(now) => self.tick(now),
            TerminalEvent::IpResolved { request_id, ip } => {
                self.dispatch_shell(ShellAction::IpResolved { request_id, ip });
            }
            TerminalEvent::IpFailed { request_id, reason } => {
                self.dispatch_shell(ShellAction::IpFailed { request_id, reason });
            }
            TerminalEvent::RouteChanged(path) => self.dispatch_shell(ShellAction::PathChanged(path)),
            TerminalEvent::ThemeChanged(theme) => {
                self.dispatch_shell(ShellAction::ThemeChanged(theme));
            }
        }
    }

    fn on_key(&mut self, key: Key, now: Duration) {
        if !self.is_visible() {
            tracing::trace!("key ignored while hidden");
            return;
        }
        let action = match key {
            Key::Char(ch) => ShellAction::InsertChar(ch),
            Key::Backspace => ShellAction::Backspace,
            Key::Enter => ShellAction::Submit { now },
            Key::Tab => ShellAction::Complete { now },
            Key::Up => ShellAction::HistoryPrev,
            Key::Down => ShellAction::HistoryNext,
            Key::Escape => ShellAction::Input(String::new()),
            Key::CtrlC => ShellAction::Interrupt,
            Key::CtrlL => ShellAction::ClearScreen,
        };
        self.dispatch_shell(action);
    }

    fn dispatch_window(&mut self, action: WindowAction) {
        let cmd = self.window.update(action);
        for scheduled in cmd.into_scheduled() {
            match scheduled.effect {
                WindowEffect::RequestAnimationFrame => self.host.request_animation_frame(),
            }
        }
    }

    fn dispatch_shell(&mut self, action: ShellAction) {
        let cmd = self.shell.update(action);
        self.run_shell(cmd);
    }

    fn run_shell(&mut self, cmd: Cmd<ShellEffect>) {
        let now = self.clock.now();
        for scheduled in cmd.into_scheduled() {
            if scheduled.delay.is_zero() || !self.config.schedule_delays {
                self.perform(scheduled.effect);
            } else {
                tracing::debug!(delay = ?scheduled.delay, effect = ?scheduled.effect, "effect deferred");
                self.delayed.push(Delayed {
                    due: now.saturating_add(scheduled.delay),
                    effect: scheduled.effect,
                });
            }
        }
    }

    fn perform(&mut self, effect: ShellEffect) {
        match effect {
            ShellEffect::Navigate(path) => self.host.navigate(&path),
            ShellEffect::OpenUrl(url) => self.host.open_url(&url),
            ShellEffect::SetTheme(theme) => self.host.set_theme(theme),
            ShellEffect::LookupIp {
                request_id,
                timeout,
            } => self.host.start_ip_lookup(request_id, timeout),
            ShellEffect::CancelLookup { request_id } => self.host.cancel_ip_lookup(request_id),
            ShellEffect::SaveSession { reopen } => {
                self.save_session(reopen);
            }
            ShellEffect::Reload => self.host.reload(),
            ShellEffect::CloseWidget => self.close(),
        }
    }

    /// Run due delayed effects, then enforce shell deadlines.
    fn tick(&mut self, now: Duration) {
        let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.delayed)
            .into_iter()
            .partition(|d| d.due <= now);
        self.delayed = later;
        for delayed in due {
            self.perform(delayed.effect);
        }
        self.dispatch_shell(ShellAction::Tick { now });
    }

    /// Write a snapshot of the current state flagged for restore.
    pub fn save_session(&mut self, reopen: bool) -> bool {
        let snapshot = SessionSnapshot::capture(&self.shell, &self.window, reopen);
        self.bridge.save(&snapshot)
    }

    /// Hide the widget, saving the session first.
    pub fn minimize(&mut self) {
        self.save_session(false);
        self.dispatch_window(WindowAction::Minimize);
    }

    /// Open the widget or bring a minimized one back.
    pub fn open(&mut self) {
        self.is_open = true;
        self.dispatch_window(WindowAction::Show);
        tracing::debug!("terminal opened");
    }

    /// Explicit close: geometry goes back to the default.
    pub fn close(&mut self) {
        self.dispatch_window(WindowAction::Reset);
        self.is_open = false;
        self.host.close_widget();
        tracing::debug!("terminal closed");
    }

    /// Consume the reopen flag left by a previous page; opens the widget if set.
    pub fn take_reopen(&mut self) -> bool {
        let reopen = self.bridge.take_reopen();
        if reopen {
            self.open();
        }
        reopen
    }
}

impl<H, S> std::fmt::Debug for TerminalWidget<H, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalWidget")
            .field("is_open", &self.is_open)
            .field("geometry", &self.window.geometry())
            .field("delayed", &self.delayed.len())
            .finish_non_exhaustive()
    }
}
