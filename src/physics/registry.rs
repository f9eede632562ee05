use crate::geometry::Coord;
use crate::window_manager::WindowHandle;
use std::sync::{Arc, Mutex, MutexGuard};

/// A window under physics control. Its position is never cached here; the
/// integrator reads it from the window manager every tick.
#[derive(Debug, Clone)]
pub struct SimulatedBody {
    pub handle: WindowHandle,
    /// Pixels per tick.
    pub velocity: Coord,
    /// Pixels per tick², constant for the lifetime of the body.
    pub acceleration: Coord,
    /// Where the drag was last sampled before release.
    pub initial_position: Coord,
}

impl SimulatedBody {
    pub fn new(
        handle: WindowHandle,
        velocity: Coord,
        acceleration: Coord,
        initial_position: Coord,
    ) -> Self {
        Self {
            handle,
            velocity,
            acceleration,
            initial_position,
        }
    }
}

/// Bodies shared between the capture monitor and the integrator. Cloning
/// yields another handle to the same collection.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    bodies: Arc<Mutex<Vec<SimulatedBody>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SimulatedBody>> {
        match self.bodies.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("body registry lock poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }

    pub fn push(&self, body: SimulatedBody) {
        self.lock().push(body);
    }

    /// Remove every body whose window has `identity` and return how many were
    /// removed. Uses swap-removal, so the order of the remaining bodies may
    /// change.
    pub fn remove_window(&self, identity: u32) -> usize {
        let mut bodies = self.lock();
        let before = bodies.len();
        let mut idx = 0;
        while idx < bodies.len() {
            if bodies[idx].handle.identity() == identity {
                bodies.swap_remove(idx);
            } else {
                idx += 1;
            }
        }
        before - bodies.len()
    }

    /// Drop every body whose window is no longer valid (identity 0) and
    /// return how many were dropped.
    pub fn retain_valid(&self) -> usize {
        let mut bodies = self.lock();
        let before = bodies.len();
        bodies.retain(|body| body.handle.is_valid());
        before - bodies.len()
    }

    pub fn contains_window(&self, identity: u32) -> bool {
        self.lock()
            .iter()
            .any(|body| body.handle.identity() == identity)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn velocities(&self) -> Vec<Coord> {
        self.lock().iter().map(|body| body.velocity).collect()
    }

    pub fn snapshot(&self) -> Vec<SimulatedBody> {
        self.lock().clone()
    }

    /// Run `f` with exclusive access to all bodies. The lock is held for the
    /// whole call.
    pub fn with_bodies<R>(&self, f: impl FnOnce(&mut [SimulatedBody]) -> R) -> R {
        let mut bodies = self.lock();
        f(bodies.as_mut_slice())
    }
}
