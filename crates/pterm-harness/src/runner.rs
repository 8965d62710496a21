#![forbid(unsafe_code)]

//! Drives a mounted widget from script lines.

use std::io::{BufRead, Write};
use std::time::Duration;

use pterm::{
    Host, Key, Point, Size, StorageBackend, TerminalConfig, TerminalEvent, TerminalWidget, Theme,
};

use crate::error::{HarnessError, Result};
use crate::host::HeadlessHost;
use crate::render::{Renderer, scrollback};
use crate::script::{Directive, parse};

type Widget = TerminalWidget<HeadlessHost, Box<dyn StorageBackend>>;

/// Answers `whoami` lookups. `None` leaves them to time out.
pub type Resolver = Option<Box<dyn Fn(u64) -> TerminalEvent>>;

/// Reboot guard; a script that reloads more often than this is looping.
const MAX_RELOADS: usize = 64;

pub struct Runner {
    config: TerminalConfig,
    viewport: Size,
    now: Duration,
    resolver: Resolver,
    widget: Option<Widget>,
    renderer: Renderer,
    reloads: usize,
}

impl Runner {
    pub fn new(
        config: TerminalConfig,
        storage: Box<dyn StorageBackend>,
        viewport: Size,
        resolver: Resolver,
    ) -> Result<Self> {
        let mut runner = Self {
            config,
            viewport,
            now: Duration::ZERO,
            resolver,
            widget: None,
            renderer: Renderer::new(),
            reloads: 0,
        };
        runner.mount(HeadlessHost::new("/", Theme::default()), storage)?;
        Ok(runner)
    }

    fn mount(&mut self, host: HeadlessHost, storage: Box<dyn StorageBackend>) -> Result<()> {
        let mut widget =
            TerminalWidget::mount(self.config.clone(), host, storage, self.viewport, self.now)?;
        if !widget.take_reopen() && !widget.is_open() {
            widget.open();
        }
        self.widget = Some(widget);
        self.renderer.invalidate();
        Ok(())
    }

    /// Empty only after a failed remount.
    fn widget(&mut self) -> Result<&mut Widget> {
        self.widget.as_mut().ok_or(HarnessError::Unmounted)
    }

    #[must_use]
    pub fn shell_lines(&self) -> Vec<String> {
        self.widget
            .as_ref()
            .map(|w| scrollback(w.shell()))
            .unwrap_or_default()
    }

    /// Run every line of `input`, writing the transcript to `out`.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        self.flush(out)?;
        for line in input.lines() {
            let line = line?;
            match parse(&line) {
                Ok(Directive::Quit) => break,
                Ok(directive) => self.apply(directive, out)?,
                Err(message) => writeln!(out, "! {message}")?,
            }
            self.settle()?;
            self.flush(out)?;
        }
        Ok(())
    }

    fn key(&mut self, key: Key) -> Result<()> {
        let now = self.now;
        self.widget()?.handle(TerminalEvent::key(key, now));
        Ok(())
    }

    fn apply(&mut self, directive: Directive, out: &mut impl Write) -> Result<()> {
        match directive {
            Directive::Line(text) => {
                self.widget()?.handle(TerminalEvent::SetInput(text));
                self.key(Key::Enter)?;
            }
            Directive::Drag { dx, dy } => {
                let grab = self.widget()?.window().geometry().position.offset(20, 10);
                let widget = self.widget()?;
                widget.handle(TerminalEvent::TitleBarPointerDown(grab));
                widget.handle(TerminalEvent::PointerMove(grab.offset(dx, dy)));
                widget.handle(TerminalEvent::PointerUp);
            }
            Directive::Resize { direction, dx, dy } => {
                let grab = Point::new(0, 0);
                let widget = self.widget()?;
                widget.handle(TerminalEvent::ResizeHandlePointerDown(direction, grab));
                widget.handle(TerminalEvent::PointerMove(grab.offset(dx, dy)));
                widget.handle(TerminalEvent::PointerUp);
            }
            Directive::Minimize => self.widget()?.handle(TerminalEvent::MinimizeButton),
            Directive::Open => self.widget()?.handle(TerminalEvent::Open),
            Directive::Close => self.widget()?.handle(TerminalEvent::CloseButton),
            Directive::ToggleMaximize => self.widget()?.handle(TerminalEvent::MaximizeButton),
            Directive::Viewport(size) => {
                self.viewport = size;
                self.widget()?.handle(TerminalEvent::ViewportResized(size));
            }
            Directive::Tab(text) => {
                if let Some(text) = text {
                    self.widget()?.handle(TerminalEvent::SetInput(text));
                }
                self.key(Key::Tab)?;
                let input = self.widget()?.shell().input().to_owned();
                writeln!(out, "> {input}")?;
            }
            Directive::Up => {
                self.key(Key::Up)?;
                let input = self.widget()?.shell().input().to_owned();
                writeln!(out, "> {input}")?;
            }
            Directive::Down => {
                self.key(Key::Down)?;
                let input = self.widget()?.shell().input().to_owned();
                writeln!(out, "> {input}")?;
            }
            Directive::Interrupt => self.key(Key::CtrlC)?,
            Directive::Wait(ms) => {
                self.now = self.now.saturating_add(Duration::from_millis(ms));
                let now = self.now;
                self.widget()?.handle(TerminalEvent::Tick(now));
            }
            Directive::Geometry => {
                let widget = self.widget()?;
                let g = widget.window().geometry();
                let line = format!(
                    "window {},{} {}x{} open={} maximized={} minimized={}",
                    g.position.x,
                    g.position.y,
                    g.size.width,
                    g.size.height,
                    widget.is_open(),
                    g.is_maximized,
                    g.is_minimized,
                );
                writeln!(out, "{line}")?;
            }
            Directive::Screen => {
                let widget = self.widget()?;
                let prompt = format!("{}{}", widget.shell().prompt(), widget.shell().input());
                self.renderer.invalidate();
                writeln!(out, "{prompt}")?;
            }
            Directive::Quit => {}
        }
        Ok(())
    }

    /// Deliver frames, answer lookups and perform reloads until the host is idle.
    fn settle(&mut self) -> Result<()> {
        loop {
            let host = self.widget()?.host_mut();
            if std::mem::take(&mut host.frame_requested) {
                self.widget()?.handle(TerminalEvent::AnimationFrame);
                continue;
            }
            if self.resolver.is_some() {
                let lookups = std::mem::take(&mut self.widget()?.host_mut().lookups);
                if !lookups.is_empty() {
                    for (request_id, _) in lookups {
                        let event = self.resolver.as_ref().map(|resolve| resolve(request_id));
                        if let Some(event) = event {
                            self.widget()?.handle(event);
                        }
                    }
                    continue;
                }
            }
            if std::mem::take(&mut self.widget()?.host_mut().reload_requested) {
                self.reload()?;
                continue;
            }
            return Ok(());
        }
    }

    fn reload(&mut self) -> Result<()> {
        self.reloads += 1;
        if self.reloads > MAX_RELOADS {
            tracing::warn!(reloads = self.reloads, "reload limit reached; ignoring");
            return Ok(());
        }
        let Some(widget) = self.widget.take() else {
            return Ok(());
        };
        let (old, storage) = widget.into_parts();
        tracing::info!(path = old.path(), "reloading page");
        let mut host = HeadlessHost::new(old.path(), old.theme());
        host.notices = old.notices;
        self.mount(host, storage)
    }

    fn flush(&mut self, out: &mut impl Write) -> Result<()> {
        let notices = std::mem::take(&mut self.widget()?.host_mut().notices);
        let lines = self.shell_lines();
        self.renderer.render(lines, out)?;
        for notice in notices {
            writeln!(out, "[{notice}]")?;
        }
        Ok(())
    }
}
