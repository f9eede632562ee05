use crate::geometry::{Coord, ScreenSize};
use crate::physics::registry::{Registry, SimulatedBody};
use crate::settings::PhysicsSettings;
use crate::window_manager::WindowBackend;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Collision limits for the top-left corner of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Right wall: `screen width - body width`.
    pub max_x: f64,
    /// Floor: `screen height - body height`.
    pub max_y: f64,
    pub damping_x: f64,
    pub damping_y: f64,
}

impl Bounds {
    pub fn new(screen: ScreenSize, settings: &PhysicsSettings) -> Self {
        Self {
            max_x: f64::from(screen.width - settings.body_width),
            max_y: f64::from(screen.height - settings.body_height),
            damping_x: settings.damping_x,
            damping_y: settings.damping_y,
        }
    }
}

/// Advance one body by a single tick starting from `position` and return the
/// position it should be moved to. Updates the body's velocity in place.
pub fn advance(body: &mut SimulatedBody, position: Coord, bounds: &Bounds) -> Coord {
    let mut pos = position + body.velocity;
    let v = &mut body.velocity;
    let a = body.acceleration;

    if v.y != 0.0 {
        if pos.y >= bounds.max_y {
            pos.y = bounds.max_y;
            // A rebound slower than one gravity step would re-hit the floor
            // every tick and never settle.
            if v.y.abs() <= a.y {
                v.y = 0.0;
                tracing::debug!(window = ?body.handle.raw(), "body came to rest");
            }
        }
        if pos.y <= 0.0 {
            pos.y = 0.0;
        }
        if pos.y == bounds.max_y || pos.y == 0.0 {
            v.y *= -bounds.damping_y;
            v.x *= bounds.damping_x;
        }
    }

    if pos.y < bounds.max_y {
        v.y += a.y;
    }

    v.x += a.x;

    // Side walls are perfectly elastic.
    if pos.x >= bounds.max_x || pos.x <= 0.0 {
        v.x = -v.x;
    }

    pos
}

/// Fixed-rate driver that moves every registered body once per tick.
pub struct Integrator {
    settings: PhysicsSettings,
    registry: Registry,
    backend: Arc<dyn WindowBackend>,
    tick_interval: Duration,
}

impl Integrator {
    pub fn new(
        settings: PhysicsSettings,
        registry: Registry,
        backend: Arc<dyn WindowBackend>,
    ) -> Self {
        let tick_interval = settings.tick_interval();
        Self {
            settings,
            registry,
            backend,
            tick_interval,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Run one tick over all bodies. Returns the number of bodies advanced.
    pub fn tick(&self) -> usize {
        let settings = &self.settings;
        self.registry.with_bodies(|bodies| {
            if bodies.is_empty() {
                return 0;
            }
            let bounds = Bounds::new(self.backend.screen_size(), settings);
            for body in bodies.iter_mut() {
                body.handle.resize(settings.body_width, settings.body_height);
                let position = body.handle.position();
                let next = advance(body, position, &bounds);
                body.handle.move_to(next);
            }
            tracing::trace!(bodies = bodies.len(), "integrator tick");
            bodies.len()
        })
    }

    /// Tick at the configured rate for as long as `keep_running` returns
    /// true. Each iteration sleeps whatever is left of the tick interval.
    pub fn run_while(&self, mut keep_running: impl FnMut() -> bool) {
        tracing::info!(
            interval_ms = self.tick_interval.as_millis() as u64,
            "physics integrator started"
        );
        while keep_running() {
            let started = Instant::now();
            self.tick();
            let elapsed = started.elapsed();
            if let Some(rest) = self.tick_interval.checked_sub(elapsed) {
                std::thread::sleep(rest);
            }
        }
    }

    pub fn run(&self) {
        self.run_while(|| true);
    }
}
