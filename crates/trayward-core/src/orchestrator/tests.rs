use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;
use crate::config::TrayBehavior;
use crate::launch::LaunchError;
use crate::window::{ActionResult, WindowActions, WindowEnumerator};

mod hide;

// -- fakes --

/// What the fake OS does with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    Remove,
    MakeInvisible,
    Ignore,
}

#[derive(Debug)]
struct World {
    windows: Vec<ManagedWindowInfo>,
    /// Windows that show up once the launcher runs.
    on_launch: Vec<ManagedWindowInfo>,
    on_close: Effect,
    on_hide: Effect,
    /// Also list invisible windows, as some enumerators do.
    lists_invisible: bool,
    enumerations: usize,
    launches: usize,
    closes: Vec<WindowHandle>,
    hides: Vec<WindowHandle>,
}

impl Default for World {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            on_launch: Vec::new(),
            on_close: Effect::Remove,
            on_hide: Effect::MakeInvisible,
            lists_invisible: false,
            enumerations: 0,
            launches: 0,
            closes: Vec::new(),
            hides: Vec::new(),
        }
    }
}

impl World {
    fn visible(&self) -> Vec<ManagedWindowInfo> {
        self.windows.iter().filter(|w| w.is_visible).cloned().collect()
    }

    fn find(&self, handle: WindowHandle) -> Option<&ManagedWindowInfo> {
        self.windows.iter().find(|w| w.handle == handle)
    }

    fn apply(&mut self, handle: WindowHandle, effect: Effect) {
        match effect {
            Effect::Remove => self.windows.retain(|w| w.handle != handle),
            Effect::MakeInvisible => {
                for w in self.windows.iter_mut().filter(|w| w.handle == handle) {
                    w.is_visible = false;
                }
            }
            Effect::Ignore => {}
        }
    }
}

type Shared = Arc<Mutex<World>>;

struct FakeEnumerator(Shared);

/// Lists only visible windows, like the desktop enumerator, unless the
/// world says otherwise.
impl WindowEnumerator for FakeEnumerator {
    fn enumerate(&self) -> Vec<ManagedWindowInfo> {
        let mut world = self.0.lock().unwrap();
        world.enumerations += 1;
        if world.lists_invisible {
            return world.windows.clone();
        }
        world.visible()
    }

    fn is_window(&self, handle: WindowHandle) -> bool {
        self.0.lock().unwrap().find(handle).is_some()
    }

    fn owner_of(&self, handle: WindowHandle) -> WindowHandle {
        self.0
            .lock()
            .unwrap()
            .find(handle)
            .map_or(0, |w| w.owner_handle)
    }
}

struct FakeActions(Shared);

impl WindowActions for FakeActions {
    fn request_close(&self, handle: WindowHandle) -> ActionResult {
        let mut world = self.0.lock().unwrap();
        world.closes.push(handle);
        let effect = world.on_close;
        world.apply(handle, effect);
        Ok(true)
    }

    fn request_hide(&self, handle: WindowHandle) -> ActionResult {
        let mut world = self.0.lock().unwrap();
        world.hides.push(handle);
        let effect = world.on_hide;
        world.apply(handle, effect);
        Ok(true)
    }
}

struct FakeLauncher {
    world: Shared,
    pid: u32,
    fail: bool,
}

impl Launcher for FakeLauncher {
    fn launch(&self, exe_path: &str, _args: &str, _hidden: bool) -> Result<u32, LaunchError> {
        if self.fail {
            return Err(LaunchError::Spawn {
                path: exe_path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        let mut world = self.world.lock().unwrap();
        world.launches += 1;
        let appearing = std::mem::take(&mut world.on_launch);
        world.windows.extend(appearing);
        Ok(self.pid)
    }
}

/// Records every wait and optionally cancels on the n-th one.
struct FakeClock {
    sleeps: Arc<Mutex<Vec<Duration>>>,
    cancel_on: Option<usize>,
}

impl Clock for FakeClock {
    fn sleep(&self, delay: Duration, cancel: &CancelToken) -> bool {
        let mut sleeps = self.sleeps.lock().unwrap();
        sleeps.push(delay);
        if self.cancel_on == Some(sleeps.len()) {
            cancel.cancel();
        }
        !cancel.is_cancelled()
    }
}

struct RecordingLog(Arc<Mutex<Vec<String>>>);

impl LogSink for RecordingLog {
    fn info(&self, msg: &str) {
        self.0.lock().unwrap().push(format!("INFO {msg}"));
    }

    fn warn(&self, msg: &str) {
        self.0.lock().unwrap().push(format!("WARN {msg}"));
    }

    fn error(&self, msg: &str) {
        self.0.lock().unwrap().push(format!("ERROR {msg}"));
    }
}

// -- harness --

const LAUNCHED_PID: u32 = 4242;

struct Harness {
    world: Shared,
    sleeps: Arc<Mutex<Vec<Duration>>>,
    lines: Arc<Mutex<Vec<String>>>,
    service: Service,
    /// Keeps the fake executable alive for the test's duration.
    _dir: tempfile::TempDir,
    exe: PathBuf,
}

#[derive(Default)]
struct Setup {
    world: World,
    launch_fails: bool,
    cancel_on_sleep: Option<usize>,
}

impl Setup {
    fn build(self) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("app.exe");
        std::fs::write(&exe, b"").unwrap();

        let world = Arc::new(Mutex::new(self.world));
        let sleeps = Arc::new(Mutex::new(Vec::new()));
        let lines = Arc::new(Mutex::new(Vec::new()));
        let service = Service::new(
            Box::new(FakeEnumerator(world.clone())),
            Box::new(FakeActions(world.clone())),
            Box::new(FakeLauncher {
                world: world.clone(),
                pid: LAUNCHED_PID,
                fail: self.launch_fails,
            }),
            Box::new(RecordingLog(lines.clone())),
        )
        .with_clock(Box::new(FakeClock {
            sleeps: sleeps.clone(),
            cancel_on: self.cancel_on_sleep,
        }));

        Harness {
            world,
            sleeps,
            lines,
            service,
            _dir: dir,
            exe,
        }
    }
}

impl Harness {
    fn exe_path(&self) -> String {
        self.exe.to_string_lossy().into_owned()
    }

    fn entry(&self, auto_hide: bool) -> ManagedAppEntry {
        ManagedAppEntry {
            name: "App".into(),
            exe_path: self.exe_path(),
            tray: TrayBehavior {
                auto_hide_on_launch: auto_hide,
            },
            ..Default::default()
        }
    }

    /// The app's own main window.
    fn app_window(&self, handle: WindowHandle, pid: u32) -> ManagedWindowInfo {
        ManagedWindowInfo {
            handle,
            process_id: pid,
            process_name: "app".into(),
            process_path: self.exe_path(),
            title: "App".into(),
            class_name: "AppWnd".into(),
            is_visible: true,
            ..Default::default()
        }
    }

    fn seed(&self, window: ManagedWindowInfo) {
        self.world.lock().unwrap().windows.push(window);
    }

    fn seed_on_launch(&self, window: ManagedWindowInfo) {
        self.world.lock().unwrap().on_launch.push(window);
    }

    fn set_effects(&self, on_close: Effect, on_hide: Effect) {
        let mut world = self.world.lock().unwrap();
        world.on_close = on_close;
        world.on_hide = on_hide;
    }

    fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    fn logged(&self, needle: &str) -> bool {
        self.lines.lock().unwrap().iter().any(|l| l.contains(needle))
    }

    fn counts(&self) -> (usize, usize, usize, usize) {
        let world = self.world.lock().unwrap();
        (
            world.enumerations,
            world.launches,
            world.closes.len(),
            world.hides.len(),
        )
    }
}

// -- timing --

#[test]
fn rounds_cover_two_per_second_plus_one() {
    assert_eq!(Timing::rounds(0), 1);
    assert_eq!(Timing::rounds(1), 3);
    assert_eq!(Timing::rounds(10), 21);
    assert_eq!(Timing::rounds(u32::MAX), u32::MAX);
}

#[test]
fn default_timing_matches_documented_waits() {
    let timing = Timing::default();

    assert_eq!(timing.round_interval, Duration::from_millis(500));
    assert_eq!(timing.verify(ActionKind::Hide).attempts, 4);
    assert_eq!(timing.verify(ActionKind::Hide).delay, Duration::from_millis(300));
    assert_eq!(timing.verify(ActionKind::Close).attempts, 10);
    assert_eq!(timing.verify(ActionKind::Close).delay, Duration::from_millis(400));
}

// -- retry loop --

#[test]
fn exhausted_retry_runs_every_round_with_waits_between() {
    // Arrange
    let h = Setup::default().build();
    let entry = h.entry(true);

    // Act
    let outcome = h.service.start_and_manage(&entry, 10, &CancelToken::new());

    // Assert
    assert_eq!(outcome.message, Message::NoWindowManaged);
    assert!(!outcome.managed);
    let (enumerations, launches, closes, hides) = h.counts();
    // One existence check, one baseline, then 21 rounds.
    assert_eq!(enumerations, 23);
    assert_eq!(launches, 1);
    assert_eq!((closes, hides), (0, 0));
    assert_eq!(h.sleeps(), vec![Duration::from_millis(500); 20]);
    assert!(h.logged("match round 21/21 candidates=0 top=none"));
}

#[test]
fn cancellation_between_rounds_stops_the_loop() {
    // Arrange
    let h = Setup {
        cancel_on_sleep: Some(3),
        ..Default::default()
    }
    .build();
    let entry = h.entry(true);

    // Act
    let outcome = h.service.start_and_manage(&entry, 10, &CancelToken::new());

    // Assert
    assert_eq!(outcome.message, Message::Cancelled);
    let (enumerations, _, closes, hides) = h.counts();
    assert_eq!(enumerations, 2 + 3);
    assert_eq!((closes, hides), (0, 0));
    assert_eq!(h.sleeps().len(), 3);
}

#[test]
fn cancelled_token_prevents_launch() {
    // Arrange
    let h = Setup::default().build();
    let entry = h.entry(true);
    let cancel = CancelToken::new();
    cancel.cancel();

    // Act
    let outcome = h.service.start_and_manage(&entry, 10, &cancel);

    // Assert
    assert_eq!(outcome.message, Message::Cancelled);
    assert_eq!(h.counts(), (0, 0, 0, 0));
}

#[test]
fn low_confidence_candidate_is_never_acted_on() {
    // Arrange: only the identity fallback locates it, and it scores 0.
    let h = Setup::default().build();
    h.seed(ManagedWindowInfo {
        handle: 0x30,
        process_id: 7,
        process_name: "apphelper".into(),
        is_visible: true,
        ..Default::default()
    });
    let entry = h.entry(true);

    // Act
    let outcome = h.service.hide_existing(&entry, 0, &CancelToken::new());

    // Assert
    assert_eq!(outcome.message, Message::NoExistingWindowManaged);
    let (_, _, closes, hides) = h.counts();
    assert_eq!((closes, hides), (0, 0));
    assert!(h.logged("skip low confidence candidate score=0 threshold=500"));
}

#[test]
fn failed_verification_moves_on_to_next_round() {
    // Arrange: the window ignores every request.
    let h = Setup::default().build();
    h.seed(h.app_window(0x40, 9));
    h.set_effects(Effect::Ignore, Effect::Ignore);
    let entry = h.entry(true);

    // Act
    let outcome = h.service.hide_existing(&entry, 1, &CancelToken::new());

    // Assert: 3 rounds, each trying close then hide with 4 checks apiece.
    assert_eq!(outcome.message, Message::NoExistingWindowManaged);
    let world = h.world.lock().unwrap();
    assert_eq!(world.closes, vec![0x40; 3]);
    assert_eq!(world.hides, vec![0x40; 3]);
    assert_eq!(world.enumerations, 3 + 3 * 2 * 4);
    drop(world);
    let sleeps = h.sleeps();
    let verify_waits = sleeps
        .iter()
        .filter(|d| **d == Duration::from_millis(300))
        .count();
    assert_eq!(verify_waits, 3 * 2 * 3);
    assert!(h.logged("verify timeout intent=hide"));
}

// -- ranking --

#[test]
fn preview_collapses_owned_dialog_into_its_owner() {
    // Arrange
    let h = Setup::default().build();
    let root = h.app_window(0x10, 9);
    let dialog = ManagedWindowInfo {
        owner_handle: 0x10,
        title: "App - Update".into(),
        class_name: "#32770".into(),
        ..h.app_window(0x11, 9)
    };
    let other = ManagedWindowInfo {
        title: String::new(),
        class_name: String::new(),
        ..h.app_window(0x20, 9)
    };
    h.seed(dialog);
    h.seed(root);
    h.seed(other);

    // Act
    let ranked = h.service.preview_candidates(&h.entry(true));

    // Assert
    let summary: Vec<_> = ranked
        .iter()
        .map(|r| (r.candidate.window.handle, r.target, r.candidate.score))
        .collect();
    assert_eq!(summary, vec![(0x10, 0x10, 1030), (0x20, 0x20, 750)]);
}

#[test]
fn preview_retargets_through_hidden_owner() {
    // Arrange: a framework's invisible owner window behind the main form.
    let h = Setup::default().build();
    h.seed(ManagedWindowInfo {
        is_visible: false,
        ..h.app_window(0x70, 9)
    });
    h.seed(ManagedWindowInfo {
        owner_handle: 0x70,
        ..h.app_window(0x71, 9)
    });

    // Act
    let ranked = h.service.preview_candidates(&h.entry(true));

    // Assert
    let targets: Vec<_> = ranked
        .iter()
        .map(|r| (r.candidate.window.handle, r.target))
        .collect();
    assert_eq!(targets, vec![(0x71, 0x70)]);
}

#[test]
fn preview_keeps_enumeration_order_on_ties() {
    let h = Setup::default().build();
    h.seed(h.app_window(0x31, 9));
    h.seed(h.app_window(0x30, 9));

    let ranked = h.service.preview_candidates(&h.entry(true));

    let handles: Vec<_> = ranked.iter().map(|r| r.target).collect();
    assert_eq!(handles, vec![0x31, 0x30]);
}

#[test]
fn preview_skips_unmanageable_windows() {
    let h = Setup::default().build();
    h.seed(ManagedWindowInfo {
        class_name: "PseudoConsoleWindow".into(),
        ..h.app_window(0x50, 9)
    });

    assert!(h.service.preview_candidates(&h.entry(true)).is_empty());
}

#[test]
fn strategy_gate_filters_before_scoring() {
    // Arrange
    let h = Setup::default().build();
    h.seed(ManagedWindowInfo {
        title: String::new(),
        ..h.app_window(0x60, 9)
    });
    let mut entry = h.entry(true);
    entry.window_match.strategy = MatchStrategy::TitleContains;

    // Act
    let ranked = h.service.preview_candidates(&entry);

    // Assert
    assert!(ranked.is_empty());
}
