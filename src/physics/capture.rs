use crate::geometry::Coord;
use crate::physics::registry::{Registry, SimulatedBody};
use crate::settings::PhysicsSettings;
use crate::window_manager::{WindowBackend, WindowHandle};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Tracking,
}

/// What a single [`CaptureMonitor::poll`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureEvent {
    None,
    /// The clicked window was a falling body and has been taken back. It is
    /// also the new drag candidate.
    Reclaimed { identity: u32 },
    /// A new foreground window became the drag candidate.
    CandidateChanged { identity: u32 },
    /// The candidate's position was sampled.
    Resampled,
    /// The button was released while moving; a body was created.
    Launched { identity: u32, velocity: Coord },
    /// The button was released without movement since the last sample.
    Dropped { identity: u32 },
}

/// Gesture state machine turning click-drag-release on a window into a new
/// simulated body. All fields except the registry are private to the monitor
/// thread.
pub struct CaptureMonitor {
    backend: Arc<dyn WindowBackend>,
    registry: Registry,
    acceleration: Coord,
    body_width: i32,
    body_height: i32,
    resample_interval: Duration,
    candidate: Option<WindowHandle>,
    candidate_position: Coord,
    held: bool,
    held_since: Option<Instant>,
}

impl CaptureMonitor {
    pub fn new(
        settings: &PhysicsSettings,
        registry: Registry,
        backend: Arc<dyn WindowBackend>,
    ) -> Self {
        Self {
            backend,
            registry,
            acceleration: settings.acceleration(),
            body_width: settings.body_width,
            body_height: settings.body_height,
            resample_interval: settings.resample_interval(),
            candidate: None,
            candidate_position: Coord::ZERO,
            held: false,
            held_since: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        if self.held {
            CaptureState::Tracking
        } else {
            CaptureState::Idle
        }
    }

    pub fn candidate(&self) -> Option<&WindowHandle> {
        self.candidate.as_ref()
    }

    pub fn candidate_position(&self) -> Coord {
        self.candidate_position
    }

    fn candidate_identity(&self) -> u32 {
        self.candidate.as_ref().map(WindowHandle::identity).unwrap_or(0)
    }

    /// Evaluate one iteration of the state machine at time `now`.
    pub fn poll(&mut self, now: Instant) -> CaptureEvent {
        if !self.backend.primary_button_pressed() {
            if self.held {
                return self.release();
            }
            return CaptureEvent::None;
        }

        let mut event = CaptureEvent::None;
        let foreground = WindowHandle::foreground(&self.backend);
        let identity = foreground.identity();

        let evicted = self.registry.retain_valid();
        if evicted > 0 {
            tracing::debug!(evicted, "dropped bodies whose windows closed");
        }

        if identity > 0 && self.registry.remove_window(identity) > 0 {
            tracing::info!(identity, "reclaimed falling window");
            event = CaptureEvent::Reclaimed { identity };
        }

        if identity > 0 && identity != self.candidate_identity() {
            if tracing::enabled!(tracing::Level::DEBUG) {
                let pointer = self.backend.pointer_position().unwrap_or_default();
                tracing::debug!(identity, %pointer, "foreground changed");
            }
            foreground.resize(self.body_width, self.body_height);
            self.candidate = Some(foreground);
            self.held = true;
            // Never derive a velocity from another window's sample.
            self.held_since = None;
            if event == CaptureEvent::None {
                event = CaptureEvent::CandidateChanged { identity };
            }
        }

        if self.held && self.resample_due(now) {
            if let Some(candidate) = &self.candidate {
                self.candidate_position = candidate.position();
            }
            self.held_since = Some(now);
            if event == CaptureEvent::None {
                event = CaptureEvent::Resampled;
            }
        }

        event
    }

    fn resample_due(&self, now: Instant) -> bool {
        match self.held_since {
            None => true,
            Some(since) => now.saturating_duration_since(since) >= self.resample_interval,
        }
    }

    fn release(&mut self) -> CaptureEvent {
        self.held = false;
        let last_sample = self.candidate_position;
        let candidate = self.candidate.take();
        self.candidate_position = Coord::ZERO;
        self.held_since = None;

        let Some(handle) = candidate else {
            return CaptureEvent::None;
        };
        let identity = handle.identity();
        if identity == 0 {
            tracing::debug!("candidate window closed before release");
            return CaptureEvent::Dropped { identity };
        }
        let velocity = handle.position() - last_sample;

        if velocity.is_zero() {
            tracing::debug!(identity, "released without motion; leaving window in place");
            return CaptureEvent::Dropped { identity };
        }

        tracing::info!(
            identity,
            vx = velocity.x,
            vy = velocity.y,
            "launching window (pixels/tick)"
        );
        self.registry.push(SimulatedBody::new(
            handle,
            velocity,
            self.acceleration,
            last_sample,
        ));
        CaptureEvent::Launched { identity, velocity }
    }

    /// Poll until `keep_running` returns false, yielding the thread between
    /// iterations.
    pub fn run_while(&mut self, mut keep_running: impl FnMut() -> bool) {
        tracing::info!("capture monitor started");
        while keep_running() {
            self.poll(Instant::now());
            std::thread::yield_now();
        }
    }

    pub fn run(&mut self) {
        self.run_while(|| true);
    }
}
