//! Widget-level behaviour against a recording host.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use pterm_core::{Point, Size};
use pterm_session::{MemoryStorage, StorageBackend};
use pterm_shell::{HistoryEntry, HostInfo, ShellConfig, Theme};
use pterm_web::{Host, Key, TerminalConfig, TerminalEvent, TerminalWidget};
use pterm_window::ResizeDirection;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

const VIEWPORT: Size = Size::new(1280, 800);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Navigate(String),
    OpenUrl(String),
    SetTheme(Theme),
    StartLookup(u64),
    CancelLookup(u64),
    Reload,
    Close,
    Frame,
}

#[derive(Debug, Default)]
struct RecordingHost {
    path: String,
    theme: Theme,
    calls: Vec<Call>,
}

impl RecordingHost {
    fn at(path: &str) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

impl Host for RecordingHost {
    fn navigate(&mut self, path: &str) {
        self.path = path.into();
        self.calls.push(Call::Navigate(path.into()));
    }

    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn open_url(&mut self, url: &str) {
        self.calls.push(Call::OpenUrl(url.into()));
    }

    fn theme(&self) -> Theme {
        self.theme
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.calls.push(Call::SetTheme(theme));
    }

    fn host_info(&self) -> HostInfo {
        HostInfo {
            platform: "TestOS".into(),
            user_agent: "Recorder/1.0".into(),
            language: "en-GB".into(),
        }
    }

    fn start_ip_lookup(&mut self, request_id: u64, _timeout: Duration) {
        self.calls.push(Call::StartLookup(request_id));
    }

    fn cancel_ip_lookup(&mut self, request_id: u64) {
        self.calls.push(Call::CancelLookup(request_id));
    }

    fn reload(&mut self) {
        self.calls.push(Call::Reload);
    }

    fn close_widget(&mut self) {
        self.calls.push(Call::Close);
    }

    fn request_animation_frame(&mut self) {
        self.calls.push(Call::Frame);
    }
}

type Widget = TerminalWidget<RecordingHost, MemoryStorage>;

fn mount_with(config: TerminalConfig, host: RecordingHost, storage: MemoryStorage) -> Widget {
    let mut widget = TerminalWidget::mount(config, host, storage, VIEWPORT, Duration::ZERO)
        .expect("valid config");
    widget.handle(TerminalEvent::Open);
    widget
}

fn mount() -> Widget {
    mount_with(
        TerminalConfig::default(),
        RecordingHost::at("/"),
        MemoryStorage::new(),
    )
}

fn type_line(widget: &mut Widget, line: &str, now: Duration) {
    for ch in line.chars() {
        widget.handle(TerminalEvent::key(Key::Char(ch), now));
    }
    widget.handle(TerminalEvent::key(Key::Enter, now));
}

fn last_output(widget: &Widget) -> Option<HistoryEntry> {
    widget.shell().history().iter().last().cloned()
}

#[test]
fn mount_reads_host_state() {
    let mut host = RecordingHost::at("/about");
    host.theme = Theme::Dark;
    let widget = TerminalWidget::mount(
        TerminalConfig::default(),
        host,
        MemoryStorage::new(),
        VIEWPORT,
        Duration::ZERO,
    )
    .unwrap();
    assert_eq!(widget.shell().path(), "/about");
    assert_eq!(widget.shell().theme(), Theme::Dark);
    assert!(!widget.is_open());
}

#[test]
fn invalid_config_is_rejected() {
    let config = TerminalConfig::default().with_session_key("");
    let result = TerminalWidget::mount(
        config,
        RecordingHost::at("/"),
        MemoryStorage::new(),
        VIEWPORT,
        Duration::ZERO,
    );
    assert!(result.is_err());
}

#[test]
fn keys_drive_the_shell() {
    let mut w = mount();
    type_line(&mut w, "uname", Duration::ZERO);
    assert_eq!(
        last_output(&w),
        Some(HistoryEntry::lines([
            "Platform: TestOS",
            "User agent: Recorder/1.0",
            "Language: en-GB",
        ]))
    );

    w.handle(TerminalEvent::key(Key::Char('h'), Duration::ZERO));
    w.handle(TerminalEvent::key(Key::Char('e'), Duration::ZERO));
    w.handle(TerminalEvent::key(Key::Tab, Duration::ZERO));
    assert_eq!(w.shell().input(), "help");
    w.handle(TerminalEvent::key(Key::Escape, Duration::ZERO));
    assert_eq!(w.shell().input(), "");

    w.handle(TerminalEvent::key(Key::Up, Duration::ZERO));
    assert_eq!(w.shell().input(), "uname");
    w.handle(TerminalEvent::key(Key::CtrlL, Duration::ZERO));
    assert!(w.shell().history().is_empty());
}

#[test]
fn keys_are_ignored_while_minimized() {
    let mut w = mount();
    w.handle(TerminalEvent::MinimizeButton);
    w.handle(TerminalEvent::key(Key::Char('x'), Duration::ZERO));
    assert_eq!(w.shell().input(), "");
    w.handle(TerminalEvent::Open);
    w.handle(TerminalEvent::key(Key::Char('x'), Duration::ZERO));
    assert_eq!(w.shell().input(), "x");
}

#[test]
fn cd_saves_then_navigates() {
    let mut w = mount();
    type_line(&mut w, "cd projects", Duration::ZERO);
    assert_eq!(w.host().calls, vec![Call::Navigate("/projects".into())]);
    assert!(w.storage().get("pterm.session").unwrap().is_some());
}

#[test]
fn theme_and_github_reach_host() {
    let mut w = mount();
    type_line(&mut w, "theme", Duration::ZERO);
    type_line(&mut w, "github", Duration::ZERO);
    assert_eq!(
        w.host().calls,
        vec![
            Call::SetTheme(Theme::Dark),
            Call::OpenUrl("https://github.com/pterm-dev".into()),
        ]
    );
}

#[test]
fn reboot_reloads_after_delay_and_restores() {
    let mut w = mount();
    type_line(&mut w, "echo persisted", Duration::from_millis(100));
    type_line(&mut w, "reboot", Duration::from_millis(200));
    assert!(w.host().calls.is_empty());
    assert_eq!(w.pending_effects(), 1);

    w.handle(TerminalEvent::Tick(Duration::from_millis(650)));
    assert!(w.host().calls.is_empty());
    w.handle(TerminalEvent::Tick(Duration::from_millis(700)));
    assert_eq!(w.host().calls, vec![Call::Reload]);
    let before: Vec<HistoryEntry> = w.shell().session_history();
    let commands = w.shell().commands().to_vec();

    // The page reloads: remount from the same store.
    let (host, storage) = w.into_parts();
    let w2 = TerminalWidget::mount(
        TerminalConfig::default(),
        RecordingHost::at(&host.path),
        storage,
        VIEWPORT,
        Duration::ZERO,
    )
    .unwrap();
    assert!(w2.is_open());
    assert_eq!(w2.shell().session_history(), before);
    assert_eq!(w2.shell().commands(), commands);
    assert!(!w2.window().geometry().is_minimized);
    assert!(w2.storage().is_empty());
}

#[test]
fn headless_mode_runs_delays_immediately() {
    let config = TerminalConfig::default().with_schedule_delays(false);
    let mut w = mount_with(config, RecordingHost::at("/"), MemoryStorage::new());
    type_line(&mut w, "exit", Duration::ZERO);
    assert_eq!(w.host().calls, vec![Call::Close]);
    assert!(!w.is_open());
    assert_eq!(w.pending_effects(), 0);
}

#[test]
fn exit_closes_and_resets_geometry() {
    let mut w = mount();
    let default = w.window().geometry();
    w.handle(TerminalEvent::TitleBarPointerDown(Point::new(500, 90)));
    w.handle(TerminalEvent::PointerMove(Point::new(450, 120)));
    w.handle(TerminalEvent::PointerUp);
    assert_ne!(w.window().geometry(), default);

    type_line(&mut w, "exit", Duration::ZERO);
    w.handle(TerminalEvent::Tick(Duration::from_millis(300)));
    assert!(!w.is_open());
    assert_eq!(w.window().geometry(), default);
}

#[test]
fn pointer_moves_are_coalesced_into_frames() {
    let mut w = mount();
    w.handle(TerminalEvent::ResizeHandlePointerDown(
        ResizeDirection::SouthEast,
        Point::new(1152, 720),
    ));
    for step in 1..=5 {
        w.handle(TerminalEvent::PointerMove(Point::new(1152 - step * 10, 720 - step * 10)));
    }
    assert_eq!(w.host().calls, vec![Call::Frame]);
    w.handle(TerminalEvent::AnimationFrame);
    assert_eq!(w.window().geometry().size, Size::new(974, 590));
    w.handle(TerminalEvent::PointerUp);
    assert_eq!(w.window().coalesced_updates(), 4);
}

#[test]
fn double_click_toggles_maximize() {
    let mut w = mount();
    w.handle(TerminalEvent::TitleBarDoubleClick);
    assert!(w.window().geometry().is_maximized);
    w.handle(TerminalEvent::ViewportResized(Size::new(1024, 768)));
    assert_eq!(w.window().geometry().size, Size::new(1024, 768));
    w.handle(TerminalEvent::MaximizeButton);
    assert!(!w.window().geometry().is_maximized);
}

#[test]
fn minimize_writes_snapshot_first() {
    let mut w = mount();
    type_line(&mut w, "echo hi", Duration::ZERO);
    w.handle(TerminalEvent::MinimizeButton);
    assert!(!w.is_visible());
    let raw = w.storage().get("pterm.session").unwrap().unwrap();
    assert!(raw.contains("echo hi"));
    assert!(raw.contains("\"is_minimized\":false"));
}

#[test]
fn whoami_round_trip_through_host() {
    let mut w = mount();
    type_line(&mut w, "whoami", Duration::from_secs(1));
    assert_eq!(w.host().calls, vec![Call::StartLookup(0)]);
    w.handle(TerminalEvent::IpResolved {
        request_id: 0,
        ip: "198.51.100.4".into(),
    });
    assert_eq!(last_output(&w), Some(HistoryEntry::line("guest@198.51.100.4")));
}

#[test]
fn whoami_timeout_cancels_host_lookup() {
    let mut w = mount();
    type_line(&mut w, "whoami", Duration::ZERO);
    w.handle(TerminalEvent::Tick(Duration::from_secs(10)));
    assert_eq!(
        w.host().calls,
        vec![Call::StartLookup(0), Call::CancelLookup(0)]
    );
    assert!(matches!(
        last_output(&w),
        Some(HistoryEntry::Error { kind: pterm_shell::ErrorKind::NetworkTimeout, .. })
    ));
}

#[test]
fn blog_leaves_reopen_flag_for_next_page() {
    let mut w = mount();
    type_line(&mut w, "blog", Duration::ZERO);
    assert_eq!(w.host().calls, vec![Call::Navigate("/blog".into())]);

    let (host, storage) = w.into_parts();
    let mut next = TerminalWidget::mount(
        TerminalConfig::default(),
        RecordingHost::at(&host.path),
        storage,
        VIEWPORT,
        Duration::ZERO,
    )
    .unwrap();
    assert_eq!(next.shell().path(), "/blog");
    assert!(next.take_reopen());
    assert!(next.is_visible());
    assert!(!next.take_reopen());
}

#[derive(Clone, Default)]
struct FieldCapture {
    values: Arc<Mutex<Vec<String>>>,
}

struct Collect<'a>(&'a mut Vec<String>);

impl tracing::field::Visit for Collect<'_> {
    fn record_debug(&mut self, _field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push(format!("{value:?}"));
    }

    fn record_str(&mut self, _field: &tracing::field::Field, value: &str) {
        self.0.push(value.to_owned());
    }
}

impl<S> tracing_subscriber::Layer<S> for FieldCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut values = self.values.lock().unwrap();
        event.record(&mut Collect(&mut values));
    }
}

#[test]
fn password_never_reaches_logs() {
    let capture = FieldCapture::default();
    let values = Arc::clone(&capture.values);
    let subscriber = tracing_subscriber::registry().with(capture);

    tracing::subscriber::with_default(subscriber, || {
        let config = TerminalConfig::default()
            .with_shell(ShellConfig::default().with_root_password("zebra-42"));
        let mut w = mount_with(config, RecordingHost::at("/"), MemoryStorage::new());
        type_line(&mut w, "sudo su", Duration::ZERO);
        type_line(&mut w, "wrong-guess", Duration::ZERO);
        type_line(&mut w, "su", Duration::ZERO);
        type_line(&mut w, "zebra-42", Duration::ZERO);
        assert!(w.shell().is_root());
        w.handle(TerminalEvent::MinimizeButton);
    });

    let values = values.lock().unwrap();
    assert!(!values.is_empty());
    assert!(values.iter().all(|v| !v.contains("zebra-42") && !v.contains("wrong-guess")));
}
