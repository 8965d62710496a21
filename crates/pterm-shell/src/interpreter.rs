#![forbid(unsafe_code)]

//! Command Interpreter reducer.
//!
//! Owns the input buffer, the scrollback, the command-literal list, and the
//! privilege flag. Every side effect (navigation, theme, network, storage,
//! reload) is returned as a [`ShellEffect`] for the host adapter to run.
//!
//! # State machine
//!
//! ```text
//! Idle ──Submit(whoami)──▶ Executing ──IpResolved/IpFailed/deadline──▶ Idle
//! Idle ──su / sudo su──▶ AwaitingPassword ──Submit(password)──▶ Idle
//! ```
//!
//! A submission while executing is ignored. `Interrupt` (Ctrl+C) leaves any
//! state and returns to idle.

use std::time::Duration;

use pterm_core::{Cmd, Model};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::command::{Builtin, Invocation, resolve};
use crate::complete::{Completer, inline_suggestion};
use crate::config::{HostInfo, ShellConfig};
use crate::error::ShellError;
use crate::history::{EntryId, History, HistoryEntry};
use crate::vocab::normalize_path;

/// Prompt shown for the next line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptMode {
    #[default]
    Normal,
    /// The next submitted line is a password and is never echoed.
    AwaitingPassword,
}

/// Site colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs to the interpreter. Time is always supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    /// Replace the whole input buffer.
    Input(String),
    InsertChar(char),
    /// Delete the last grapheme cluster.
    Backspace,
    HistoryPrev,
    HistoryNext,
    Complete { now: Duration },
    Submit { now: Duration },
    /// Ctrl+C.
    Interrupt,
    /// Ctrl+L.
    ClearScreen,
    Tick { now: Duration },
    IpResolved { request_id: u64, ip: String },
    IpFailed { request_id: u64, reason: String },
    /// The host router moved to another page.
    PathChanged(String),
    /// The host theme changed outside the terminal.
    ThemeChanged(Theme),
}

/// Effects requested from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEffect {
    Navigate(String),
    OpenUrl(String),
    SetTheme(Theme),
    /// Start the public IP lookup; answer with `IpResolved` or `IpFailed`.
    LookupIp { request_id: u64, timeout: Duration },
    CancelLookup { request_id: u64 },
    /// Write a session snapshot flagged for restore.
    SaveSession { reopen: bool },
    /// Full page reload.
    Reload,
    CloseWidget,
}

#[derive(Debug, Clone, Copy)]
struct PendingLookup {
    request_id: u64,
    entry: EntryId,
    deadline: Duration,
}

/// The terminal's command interpreter.
#[derive(Debug, Clone)]
pub struct Interpreter {
    config: ShellConfig,
    host_info: HostInfo,
    input: String,
    accepted: bool,
    suggestion: Option<String>,
    history: History,
    commands: Vec<String>,
    history_index: Option<usize>,
    draft: String,
    is_root: bool,
    mode: PromptMode,
    path: String,
    theme: Theme,
    completer: Completer,
    pending: Option<PendingLookup>,
    next_request_id: u64,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}

impl Interpreter {
    /// Create an interpreter showing the welcome banner.
    #[must_use]
    pub fn new(config: ShellConfig) -> Self {
        let mut history = History::new(config.max_history_lines);
        if !config.banner.is_empty() {
            history.push_banner(HistoryEntry::lines(config.banner.iter().cloned()));
        }
        Self {
            host_info: config.host_info.clone(),
            completer: Completer::new(config.completion_debounce),
            config,
            input: String::new(),
            accepted: false,
            suggestion: None,
            history,
            commands: Vec::new(),
            history_index: None,
            draft: String::new(),
            is_root: false,
            mode: PromptMode::Normal,
            path: "/".into(),
            theme: Theme::default(),
            pending: None,
            next_request_id: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Ghost text after the cursor.
    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// Whether the current input came from autocomplete.
    #[must_use]
    pub const fn input_accepted(&self) -> bool {
        self.accepted
    }

    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Submitted command literals, oldest first.
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    #[must_use]
    pub const fn history_index(&self) -> Option<usize> {
        self.history_index
    }

    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.is_root
    }

    #[must_use]
    pub const fn mode(&self) -> PromptMode {
        self.mode
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// A command is in flight; submissions are ignored.
    #[must_use]
    pub const fn is_executing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_host_info(&mut self, info: HostInfo) {
        self.host_info = info;
    }

    pub fn set_path(&mut self, path: &str) {
        self.path = normalize_path(path);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Prompt prefix for the current mode and privilege.
    #[must_use]
    pub fn prompt(&self) -> String {
        match (self.mode, self.is_root) {
            (PromptMode::AwaitingPassword, _) => "Password: ".to_owned(),
            (PromptMode::Normal, true) => format!("root@{}:{}# ", self.config.host, self.path),
            (PromptMode::Normal, false) => {
                format!("{}@{}:{}$ ", self.config.user, self.config.host, self.path)
            }
        }
    }

    /// Adopt restored session state behind the banner.
    pub fn restore_session(
        &mut self,
        entries: Vec<HistoryEntry>,
        commands: Vec<String>,
        is_root: bool,
    ) {
        self.history.restore(entries);
        self.commands = commands;
        let excess = self.commands.len().saturating_sub(self.config.max_commands);
        self.commands.drain(..excess);
        self.is_root = is_root;
        self.history_index = None;
        tracing::info!(
            entries = self.history.len(),
            commands = self.commands.len(),
            is_root,
            "shell session restored"
        );
    }

    /// History to persist: everything but the banner.
    #[must_use]
    pub fn session_history(&self) -> Vec<HistoryEntry> {
        self.history.entries_without_banner()
    }

    // ── Input editing ───────────────────────────────────────────────────

    fn input_changed(&mut self) {
        self.suggestion = match self.mode {
            PromptMode::Normal => inline_suggestion(&self.input, &self.config.vocabulary),
            PromptMode::AwaitingPassword => None,
        };
    }

    pub fn set_input(&mut self, text: String) {
        self.input = text;
        self.accepted = false;
        self.input_changed();
    }

    pub fn insert_char(&mut self, ch: char) {
        self.input.push(ch);
        self.input_changed();
    }

    pub fn backspace(&mut self) {
        if let Some((idx, _)) = self.input.grapheme_indices(true).next_back() {
            self.input.truncate(idx);
            self.input_changed();
        }
    }

    /// Step back through submitted commands.
    pub fn history_prev(&mut self) {
        if self.mode != PromptMode::Normal || self.commands.is_empty() {
            return;
        }
        let index = match self.history_index {
            None => {
                self.draft = std::mem::take(&mut self.input);
                self.commands.len() - 1
            }
            Some(i) => i.saturating_sub(1),
        };
        self.history_index = Some(index);
        self.input = self.commands[index].clone();
        self.accepted = false;
        self.input_changed();
    }

    /// Step forward; past the newest command the draft comes back.
    pub fn history_next(&mut self) {
        let Some(i) = self.history_index else {
            return;
        };
        if i + 1 < self.commands.len() {
            self.history_index = Some(i + 1);
            self.input = self.commands[i + 1].clone();
        } else {
            self.history_index = None;
            self.input = std::mem::take(&mut self.draft);
        }
        self.accepted = false;
        self.input_changed();
    }

    /// Run tab completion on the current input.
    pub fn complete(&mut self, now: Duration) {
        if self.mode != PromptMode::Normal || self.is_executing() {
            return;
        }
        let outcome = self
            .completer
            .complete(&self.input, &self.config.vocabulary, now);
        if outcome.accepted {
            self.accepted = true;
        }
        self.input = outcome.input;
        self.input_changed();
    }

    // ── Submission ──────────────────────────────────────────────────────

    /// Evaluate the current line.
    pub fn submit(&mut self, now: Duration) -> Cmd<ShellEffect> {
        if self.is_executing() {
            tracing::debug!("submit ignored while a command is executing");
            return Cmd::none();
        }
        let line = std::mem::take(&mut self.input);
        let accepted = std::mem::take(&mut self.accepted);
        self.suggestion = None;
        self.history_index = None;
        self.draft.clear();
        self.completer.reset();

        if self.mode == PromptMode::AwaitingPassword {
            self.mode = PromptMode::Normal;
            if line == self.config.root_password {
                self.is_root = true;
                tracing::info!("root privileges granted");
            } else {
                tracing::debug!("su authentication failed");
                self.push_error(&ShellError::AuthFailure);
            }
            return Cmd::none();
        }

        self.history.push(HistoryEntry::Command {
            text: line.clone(),
            is_root: self.is_root,
            accepted,
            path: self.path.clone(),
        });
        if line.trim().is_empty() {
            return Cmd::none();
        }
        self.remember_command(&line);

        match resolve(&line) {
            Ok(Some(invocation)) => self.execute(invocation, now),
            Ok(None) => Cmd::none(),
            Err(err) => {
                self.push_error(&err);
                Cmd::none()
            }
        }
    }

    fn remember_command(&mut self, line: &str) {
        self.commands.push(line.to_owned());
        let excess = self.commands.len().saturating_sub(self.config.max_commands);
        self.commands.drain(..excess);
    }

    fn print(&mut self, line: impl Into<String>) -> EntryId {
        self.history.push(HistoryEntry::line(line))
    }

    fn push_error(&mut self, err: &ShellError) {
        self.history.push(HistoryEntry::error(err));
    }

    fn execute(&mut self, invocation: Invocation, now: Duration) -> Cmd<ShellEffect> {
        let Invocation {
            builtin,
            args,
            raw_args,
        } = invocation;
        tracing::debug!(command = builtin.name(), "executing");
        match builtin {
            Builtin::Help => {
                let mut lines = vec!["Available commands:".to_owned()];
                lines.extend(
                    Builtin::ALL
                        .iter()
                        .map(|b| format!("  {:<8}{}", b.name(), b.summary())),
                );
                self.history.push(HistoryEntry::Output { lines });
                Cmd::none()
            }
            Builtin::Ls => {
                let lines: Vec<String> = self
                    .config
                    .vocabulary
                    .route_paths()
                    .map(str::to_owned)
                    .collect();
                self.history.push(HistoryEntry::Output { lines });
                Cmd::none()
            }
            Builtin::Pwd => {
                let path = self.path.clone();
                self.print(path);
                Cmd::none()
            }
            Builtin::Cd => self.cd(&args),
            Builtin::Uname => {
                let info = &self.host_info;
                let lines = vec![
                    format!("Platform: {}", info.platform),
                    format!("User agent: {}", info.user_agent),
                    format!("Language: {}", info.language),
                ];
                self.history.push(HistoryEntry::Output { lines });
                Cmd::none()
            }
            Builtin::Echo => {
                self.print(raw_args);
                Cmd::none()
            }
            Builtin::Clear => {
                self.history.clear();
                Cmd::none()
            }
            Builtin::Whoami => self.start_lookup(now),
            Builtin::Reboot => {
                self.print("Rebooting…");
                Cmd::batch(vec![
                    Cmd::effect(ShellEffect::SaveSession { reopen: false }),
                    Cmd::after(self.config.reboot_delay, Cmd::effect(ShellEffect::Reload)),
                ])
            }
            Builtin::Github => {
                self.print("Opening GitHub…");
                Cmd::effect(ShellEffect::OpenUrl(self.config.github_url.clone()))
            }
            Builtin::Blog => {
                self.print("Opening blog…");
                let route = normalize_path(&self.config.blog_route);
                self.path.clone_from(&route);
                Cmd::batch(vec![
                    Cmd::effect(ShellEffect::SaveSession { reopen: true }),
                    Cmd::effect(ShellEffect::Navigate(route)),
                ])
            }
            Builtin::Theme => {
                self.theme = self.theme.toggled();
                self.print(format!("Theme set to {}", self.theme));
                Cmd::effect(ShellEffect::SetTheme(self.theme))
            }
            // `sudo su` resolves to `Su`; a bare `Sudo` never reaches here.
            Builtin::Su | Builtin::Sudo => {
                if self.is_root {
                    self.print("Already root.");
                } else {
                    self.print("Password:");
                    self.mode = PromptMode::AwaitingPassword;
                    tracing::debug!("awaiting password");
                }
                Cmd::none()
            }
            Builtin::Logout => {
                if self.is_root {
                    self.is_root = false;
                    self.print("logout");
                    tracing::info!("root privileges dropped");
                } else {
                    self.print("Already a normal user.");
                }
                Cmd::none()
            }
            Builtin::Exit => {
                self.print("Goodbye.");
                Cmd::after(self.config.exit_delay, Cmd::effect(ShellEffect::CloseWidget))
            }
        }
    }

    fn cd(&mut self, args: &[String]) -> Cmd<ShellEffect> {
        let Some(target) = args.first() else {
            self.push_error(&ShellError::MissingArgument {
                command: "cd".into(),
            });
            return Cmd::none();
        };
        let path = normalize_path(target);
        if !self.config.vocabulary.has_route(&path) {
            self.push_error(&ShellError::UnknownRoute { path });
            return Cmd::none();
        }
        self.print(format!("Navigated to {path}"));
        self.path.clone_from(&path);
        Cmd::batch(vec![
            Cmd::effect(ShellEffect::SaveSession { reopen: true }),
            Cmd::effect(ShellEffect::Navigate(path)),
        ])
    }

    // ── whoami lookup ───────────────────────────────────────────────────

    fn start_lookup(&mut self, now: Duration) -> Cmd<ShellEffect> {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        let entry = self.print("Checking…");
        let timeout = self.config.whoami_timeout;
        self.pending = Some(PendingLookup {
            request_id,
            entry,
            deadline: now.saturating_add(timeout),
        });
        tracing::debug!(request_id, ?timeout, "ip lookup started");
        Cmd::effect(ShellEffect::LookupIp {
            request_id,
            timeout,
        })
    }

    fn take_pending(&mut self, request_id: u64) -> Option<PendingLookup> {
        if self.pending.is_some_and(|p| p.request_id == request_id) {
            self.pending.take()
        } else {
            tracing::warn!(request_id, "ignoring stale lookup result");
            None
        }
    }

    /// Replace the interim line, or append if it was already evicted.
    fn finish_lookup(&mut self, pending: PendingLookup, entry: HistoryEntry) {
        if !self.history.replace(pending.entry, entry.clone()) {
            self.history.push(entry);
        }
    }

    fn on_ip_resolved(&mut self, request_id: u64, ip: &str) {
        if let Some(pending) = self.take_pending(request_id) {
            let user = if self.is_root {
                "root"
            } else {
                self.config.user.as_str()
            };
            let line = HistoryEntry::line(format!("{user}@{ip}"));
            self.finish_lookup(pending, line);
            tracing::debug!(request_id, "ip lookup resolved");
        }
    }

    fn on_ip_failed(&mut self, request_id: u64, reason: String) {
        if let Some(pending) = self.take_pending(request_id) {
            let err = ShellError::NetworkFailure { reason };
            self.finish_lookup(pending, HistoryEntry::error(&err));
            tracing::debug!(request_id, "ip lookup failed");
        }
    }

    /// Enforce the lookup deadline.
    pub fn tick(&mut self, now: Duration) -> Cmd<ShellEffect> {
        let Some(pending) = self.pending else {
            return Cmd::none();
        };
        if now < pending.deadline {
            return Cmd::none();
        }
        self.pending = None;
        let err = ShellError::NetworkTimeout {
            timeout: self.config.whoami_timeout,
        };
        self.finish_lookup(pending, HistoryEntry::error(&err));
        tracing::debug!(request_id = pending.request_id, "ip lookup timed out");
        Cmd::effect(ShellEffect::CancelLookup {
            request_id: pending.request_id,
        })
    }

    /// Ctrl+C: cancel the in-flight lookup, the password prompt, or the line.
    pub fn interrupt(&mut self) -> Cmd<ShellEffect> {
        self.suggestion = None;
        self.history_index = None;
        self.completer.reset();
        if let Some(pending) = self.pending.take() {
            self.finish_lookup(pending, HistoryEntry::line("^C"));
            return Cmd::effect(ShellEffect::CancelLookup {
                request_id: pending.request_id,
            });
        }
        let line = std::mem::take(&mut self.input);
        self.accepted = false;
        match self.mode {
            PromptMode::AwaitingPassword => {
                self.mode = PromptMode::Normal;
                self.print("^C");
            }
            PromptMode::Normal => {
                self.history.push(HistoryEntry::Command {
                    text: format!("{line}^C"),
                    is_root: self.is_root,
                    accepted: false,
                    path: self.path.clone(),
                });
            }
        }
        Cmd::none()
    }
}

impl Model for Interpreter {
    type Action = ShellAction;
    type Effect = ShellEffect;

    fn update(&mut self, action: ShellAction) -> Cmd<ShellEffect> {
        match action {
            ShellAction::Input(text) => self.set_input(text),
            ShellAction::InsertChar(ch) => self.insert_char(ch),
            ShellAction::Backspace => self.backspace(),
            ShellAction::HistoryPrev => self.history_prev(),
            ShellAction::HistoryNext => self.history_next(),
            ShellAction::Complete { now } => self.complete(now),
            ShellAction::Submit { now } => return self.submit(now),
            ShellAction::Interrupt => return self.interrupt(),
            ShellAction::ClearScreen => self.history.clear(),
            ShellAction::Tick { now } => return self.tick(now),
            ShellAction::IpResolved { request_id, ip } => self.on_ip_resolved(request_id, &ip),
            ShellAction::IpFailed { request_id, reason } => self.on_ip_failed(request_id, reason),
            ShellAction::PathChanged(path) => self.set_path(&path),
            ShellAction::ThemeChanged(theme) => self.set_theme(theme),
        }
        Cmd::none()
    }
}
