use crate::physics::capture::CaptureMonitor;
use crate::physics::engine::Integrator;
use crate::physics::registry::Registry;
use crate::settings::PhysicsSettings;
use crate::window_manager::WindowBackend;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Owns the shared registry and wires the capture monitor and the integrator
/// to the same window backend.
pub struct WindowPhysics {
    settings: PhysicsSettings,
    backend: Arc<dyn WindowBackend>,
    registry: Registry,
}

impl WindowPhysics {
    pub fn new(settings: PhysicsSettings, backend: Arc<dyn WindowBackend>) -> Self {
        Self {
            settings,
            backend,
            registry: Registry::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn capture_monitor(&self) -> CaptureMonitor {
        CaptureMonitor::new(
            &self.settings,
            self.registry.clone(),
            Arc::clone(&self.backend),
        )
    }

    pub fn integrator(&self) -> Integrator {
        Integrator::new(
            self.settings.clone(),
            self.registry.clone(),
            Arc::clone(&self.backend),
        )
    }

    /// Start the capture monitor on its own thread. It runs until
    /// `keep_running` returns false.
    pub fn spawn_monitor_while<F>(&self, keep_running: F) -> std::io::Result<JoinHandle<()>>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let mut monitor = self.capture_monitor();
        thread::Builder::new()
            .name("capture-monitor".into())
            .spawn(move || monitor.run_while(keep_running))
    }

    pub fn spawn_monitor(&self) -> std::io::Result<JoinHandle<()>> {
        self.spawn_monitor_while(|| true)
    }

    /// Spawn the capture monitor and drive the integrator on the calling
    /// thread. Only returns if the monitor thread cannot be started.
    pub fn run(self) -> anyhow::Result<()> {
        let _monitor = self.spawn_monitor()?;
        tracing::info!(
            fps = self.settings.fps,
            width = self.settings.body_width,
            height = self.settings.body_height,
            "window physics running"
        );
        self.integrator().run();
        Ok(())
    }
}
