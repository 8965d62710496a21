//! Snapshot write/restore across a simulated reload.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use pterm_core::{Model, Point, Size};
use pterm_session::{
    MemoryStorage, SessionBridge, SessionSnapshot, StorageBackend, StorageError, StorageResult,
};
use pterm_shell::{HistoryEntry, Interpreter, ShellAction, ShellConfig};
use pterm_window::{WindowConstraints, WindowManager};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

const VIEWPORT: Size = Size::new(1280, 800);

fn mount() -> (Interpreter, WindowManager) {
    (
        Interpreter::new(ShellConfig::default()),
        WindowManager::new(WindowConstraints::default(), VIEWPORT),
    )
}

fn run(sh: &mut Interpreter, line: &str) {
    sh.update(ShellAction::Input(line.to_owned()));
    let _ = sh.update(ShellAction::Submit {
        now: Duration::ZERO,
    });
}

/// Store that fails every operation.
struct BrokenStorage;

impl StorageBackend for BrokenStorage {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("quota exceeded".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("quota exceeded".into()))
    }

    fn remove(&mut self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("quota exceeded".into()))
    }
}

#[derive(Clone, Default)]
struct WarnCapture {
    warnings: Arc<Mutex<Vec<String>>>,
}

impl<S> tracing_subscriber::Layer<S> for WarnCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.warnings
                .lock()
                .unwrap()
                .push(event.metadata().name().to_owned());
        }
    }
}

#[test]
fn reboot_snapshot_reproduces_session() {
    let (mut shell, mut window) = mount();
    run(&mut shell, "echo before reboot");
    run(&mut shell, "su");
    run(&mut shell, "password");
    window.begin_drag(Point::new(400, 90));
    let _ = window.update_drag(Point::new(300, 150));
    window.end_drag();
    window.minimize();
    run(&mut shell, "reboot");

    let mut bridge = SessionBridge::new(MemoryStorage::new());
    assert!(bridge.save(&SessionSnapshot::capture(&shell, &window, false)));
    let saved_history = shell.session_history();

    // Next page load.
    let mut storage = bridge.into_storage();
    let raw = storage.get("pterm.session").unwrap().unwrap();
    assert!(raw.contains("\"restore\":true"));
    let mut bridge = SessionBridge::new(std::mem::take(&mut storage));
    let (mut shell2, mut window2) = mount();
    let banner: Vec<HistoryEntry> = shell2.history().iter().cloned().collect();

    let snapshot = bridge.take_restore().expect("snapshot flagged for restore");
    snapshot.apply(&mut shell2, &mut window2);

    let mut expected = banner;
    expected.extend(saved_history);
    assert_eq!(shell2.history().iter().cloned().collect::<Vec<_>>(), expected);
    assert_eq!(shell2.commands(), shell.commands());
    assert!(shell2.is_root());
    let g = window2.geometry();
    assert!(!g.is_minimized);
    assert_eq!(g.position, window.geometry().position);
    assert_eq!(g.size, window.geometry().size);

    // Consumed once.
    assert!(bridge.take_restore().is_none());
}

#[test]
fn restored_geometry_is_reclamped_to_new_viewport() {
    let (shell, mut window) = mount();
    window.begin_drag(Point::new(0, 0));
    let _ = window.update_drag(Point::new(1000, 500));
    window.end_drag();

    let mut bridge = SessionBridge::new(MemoryStorage::new());
    bridge.save(&SessionSnapshot::capture(&shell, &window, true));

    let small = Size::new(600, 500);
    let mut shell2 = Interpreter::default();
    let mut window2 = WindowManager::new(WindowConstraints::default(), small);
    bridge
        .take_restore()
        .expect("snapshot")
        .apply(&mut shell2, &mut window2);
    assert!(window2.geometry().satisfies(window2.constraints(), small));
    assert!(bridge.take_reopen());
}

#[test]
fn broken_storage_degrades_silently() {
    let capture = WarnCapture::default();
    let warnings = Arc::clone(&capture.warnings);
    let subscriber = tracing_subscriber::registry().with(capture);

    tracing::subscriber::with_default(subscriber, || {
        let (shell, window) = mount();
        let mut bridge = SessionBridge::new(BrokenStorage);
        assert!(!bridge.save(&SessionSnapshot::capture(&shell, &window, true)));
        assert!(bridge.take_restore().is_none());
        assert!(!bridge.take_reopen());
        bridge.discard();
    });

    assert!(warnings.lock().unwrap().len() >= 3);
}

#[test]
fn full_history_reboot_keeps_banner() {
    let config = ShellConfig::default().with_max_history_lines(20);
    let mut shell = Interpreter::new(config.clone());
    let window = WindowManager::new(WindowConstraints::default(), VIEWPORT);
    for i in 0..30 {
        run(&mut shell, &format!("echo {i}"));
    }
    let saved_history = shell.session_history();
    assert_eq!(
        saved_history.iter().map(HistoryEntry::line_count).sum::<usize>(),
        20
    );

    let mut bridge = SessionBridge::new(MemoryStorage::new());
    assert!(bridge.save(&SessionSnapshot::capture(&shell, &window, false)));

    let mut shell2 = Interpreter::new(config);
    let mut window2 = WindowManager::new(WindowConstraints::default(), VIEWPORT);
    let banner: Vec<HistoryEntry> = shell2.history().iter().cloned().collect();
    assert!(!banner.is_empty());
    bridge
        .take_restore()
        .expect("snapshot flagged for restore")
        .apply(&mut shell2, &mut window2);

    let restored: Vec<HistoryEntry> = shell2.history().iter().cloned().collect();
    assert_eq!(restored[..banner.len()], banner[..]);
    assert!(shell2.history().total_lines() <= 20);
    // Newest entries survive, oldest saved ones make room for the banner.
    let tail = &restored[banner.len()..];
    assert!(!tail.is_empty());
    assert_eq!(tail, &saved_history[saved_history.len() - tail.len()..]);
}
