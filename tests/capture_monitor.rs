use falling_windows::geometry::{Coord, WindowRect};
use falling_windows::physics::{CaptureEvent, CaptureMonitor, CaptureState, Integrator, Registry};
use falling_windows::settings::PhysicsSettings;
use falling_windows::window_manager::{MockWindowBackend, RawWindow, WindowBackend};
use std::sync::Arc;
use std::time::{Duration, Instant};

const WIN: RawWindow = RawWindow(0x10);
const ID: u32 = 4242;

struct Harness {
    mock: Arc<MockWindowBackend>,
    registry: Registry,
    monitor: CaptureMonitor,
    settings: PhysicsSettings,
    now: Instant,
}

impl Harness {
    fn new() -> Self {
        let mock = Arc::new(MockWindowBackend::default());
        mock.add_window(WIN, ID, WindowRect::new(100, 100, 800, 600));
        let backend: Arc<dyn WindowBackend> = mock.clone();
        let settings = PhysicsSettings::default();
        let registry = Registry::new();
        let monitor = CaptureMonitor::new(&settings, registry.clone(), backend);
        Self {
            mock,
            registry,
            monitor,
            settings,
            now: Instant::now(),
        }
    }

    fn poll_after(&mut self, elapsed: Duration) -> CaptureEvent {
        self.now += elapsed;
        self.monitor.poll(self.now)
    }

    fn press_on(&mut self, window: RawWindow) -> CaptureEvent {
        self.mock.set_foreground(window);
        self.mock.set_button_pressed(true);
        self.poll_after(Duration::ZERO)
    }

    fn drag_to(&mut self, x: i32, y: i32) {
        self.mock.set_rect(WIN, WindowRect::new(x, y, 300, 300));
    }

    fn release(&mut self) -> CaptureEvent {
        self.mock.set_button_pressed(false);
        self.poll_after(Duration::from_millis(1))
    }
}

#[test]
fn press_captures_and_resizes_foreground_window() {
    let mut h = Harness::new();
    assert_eq!(h.press_on(WIN), CaptureEvent::CandidateChanged { identity: ID });
    assert_eq!(h.monitor.state(), CaptureState::Tracking);
    assert_eq!(h.mock.rect_of(WIN), Some(WindowRect::new(100, 100, 300, 300)));
    assert_eq!(h.monitor.candidate_position(), Coord::new(100.0, 100.0));
    assert!(h.registry.is_empty());
}

#[test]
fn release_without_movement_creates_no_body() {
    let mut h = Harness::new();
    h.press_on(WIN);
    assert_eq!(h.release(), CaptureEvent::Dropped { identity: ID });
    assert!(h.registry.is_empty());
    assert_eq!(h.monitor.state(), CaptureState::Idle);
    assert!(h.monitor.candidate().is_none());
    assert_eq!(h.monitor.candidate_position(), Coord::ZERO);
}

#[test]
fn release_after_drag_creates_one_body_with_drag_velocity() {
    let mut h = Harness::new();
    h.press_on(WIN);
    h.drag_to(125, 90);

    assert_eq!(
        h.release(),
        CaptureEvent::Launched {
            identity: ID,
            velocity: Coord::new(25.0, -10.0)
        }
    );
    assert_eq!(h.registry.len(), 1);
    assert_eq!(h.registry.velocities(), vec![Coord::new(25.0, -10.0)]);

    let body = &h.registry.snapshot()[0];
    assert_eq!(body.acceleration, Coord::new(0.0, 1.5));
    assert_eq!(body.initial_position, Coord::new(100.0, 100.0));
    assert_eq!(body.handle.identity(), ID);
    assert_eq!(h.monitor.state(), CaptureState::Idle);
}

#[test]
fn velocity_comes_from_the_last_sample_only() {
    let mut h = Harness::new();
    let interval = h.settings.resample_interval();
    h.press_on(WIN);

    // Slow drag, sampled along the way.
    h.drag_to(110, 100);
    assert_eq!(h.poll_after(interval), CaptureEvent::Resampled);
    h.drag_to(120, 100);
    assert_eq!(h.poll_after(interval), CaptureEvent::Resampled);

    // Fast flick right before release.
    h.drag_to(180, 60);
    assert_eq!(h.poll_after(Duration::from_millis(1)), CaptureEvent::None);

    match h.release() {
        CaptureEvent::Launched { velocity, .. } => assert_eq!(velocity, Coord::new(60.0, -40.0)),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn sample_taken_just_before_release_yields_no_body() {
    let mut h = Harness::new();
    let interval = h.settings.resample_interval();
    h.press_on(WIN);
    h.drag_to(300, 300);
    assert_eq!(h.poll_after(interval), CaptureEvent::Resampled);
    assert_eq!(h.release(), CaptureEvent::Dropped { identity: ID });
    assert!(h.registry.is_empty());
}

#[test]
fn button_up_while_idle_does_nothing() {
    let mut h = Harness::new();
    h.mock.set_foreground(WIN);
    assert_eq!(h.poll_after(Duration::from_millis(5)), CaptureEvent::None);
    assert_eq!(h.monitor.state(), CaptureState::Idle);
    assert_eq!(h.mock.move_count(), 0);
}

#[test]
fn press_with_no_foreground_window_stays_idle() {
    let mut h = Harness::new();
    assert_eq!(h.press_on(RawWindow::NONE), CaptureEvent::None);
    assert_eq!(h.monitor.state(), CaptureState::Idle);
}

#[test]
fn clicking_a_falling_window_reclaims_it_before_the_next_tick() {
    let mut h = Harness::new();
    h.press_on(WIN);
    h.drag_to(150, 150);
    h.release();
    assert_eq!(h.registry.len(), 1);

    let backend: Arc<dyn WindowBackend> = h.mock.clone();
    let integrator = Integrator::new(h.settings.clone(), h.registry.clone(), backend);
    integrator.tick();
    let moved_to = h.mock.rect_of(WIN).unwrap();

    assert_eq!(h.press_on(WIN), CaptureEvent::Reclaimed { identity: ID });
    assert!(h.registry.is_empty());
    assert_eq!(h.monitor.state(), CaptureState::Tracking);

    assert_eq!(integrator.tick(), 0);
    assert_eq!(h.mock.rect_of(WIN), Some(moved_to));
}

#[test]
fn switching_foreground_while_held_restarts_sampling() {
    let mut h = Harness::new();
    let other = RawWindow(0x20);
    h.mock.add_window(other, 7, WindowRect::new(500, 500, 640, 480));

    h.press_on(WIN);
    assert_eq!(
        h.press_on(other),
        CaptureEvent::CandidateChanged { identity: 7 }
    );
    assert_eq!(h.monitor.candidate_position(), Coord::new(500.0, 500.0));
    assert_eq!(h.mock.rect_of(other), Some(WindowRect::new(500, 500, 300, 300)));
    assert_eq!(h.release(), CaptureEvent::Dropped { identity: 7 });
}

#[test]
fn candidate_closed_before_release_creates_no_body() {
    let mut h = Harness::new();
    h.press_on(WIN);
    h.mock.close_window(WIN);
    assert_eq!(h.release(), CaptureEvent::Dropped { identity: 0 });
    assert!(h.registry.is_empty());
}

#[test]
fn missing_pointer_position_does_not_block_capture() {
    let mut h = Harness::new();
    h.mock.set_pointer(None);
    assert_eq!(h.press_on(WIN), CaptureEvent::CandidateChanged { identity: ID });
}

#[test]
fn press_evicts_bodies_whose_windows_closed() {
    let mut h = Harness::new();
    let untitled = RawWindow(0x30);
    h.mock.add_window(untitled, 0, WindowRect::new(0, 0, 640, 480));

    h.press_on(WIN);
    h.drag_to(150, 150);
    h.release();
    assert_eq!(h.registry.len(), 1);

    let backend: Arc<dyn WindowBackend> = h.mock.clone();
    let integrator = Integrator::new(h.settings.clone(), h.registry.clone(), backend);
    h.mock.close_window(WIN);
    for _ in 0..20 {
        integrator.tick();
    }
    assert_eq!(h.registry.len(), 1);

    assert_eq!(h.press_on(untitled), CaptureEvent::None);
    assert!(h.registry.is_empty());
    assert_eq!(h.monitor.state(), CaptureState::Idle);

    let moves = h.mock.move_count();
    assert_eq!(integrator.tick(), 0);
    assert_eq!(h.mock.move_count(), moves);
}
