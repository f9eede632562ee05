use crate::geometry::Coord;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SETTINGS_FILE: &str = "falling_windows.json";

/// Tunables shared by the integrator and the capture monitor. Built once at
/// startup and handed to both loops by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsSettings {
    /// Integrator ticks per second.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Horizontal acceleration in px/tick².
    #[serde(default, alias = "gravityX")]
    pub gravity_x: f64,
    /// Vertical acceleration (gravity) in px/tick².
    #[serde(default = "default_gravity_y", alias = "gravityY")]
    pub gravity_y: f64,
    /// Horizontal velocity factor applied on every vertical bounce.
    #[serde(default = "default_damping_x", alias = "dampingX")]
    pub damping_x: f64,
    /// Vertical restitution factor.
    #[serde(default = "default_damping_y", alias = "dampingY")]
    pub damping_y: f64,
    #[serde(default = "default_body_size", alias = "bodyWidth")]
    pub body_width: i32,
    #[serde(default = "default_body_size", alias = "bodyHeight")]
    pub body_height: i32,
    /// Number of ticks between drag position samples.
    #[serde(default = "default_resample_ticks", alias = "resampleTicks")]
    pub resample_ticks: u32,
    /// When enabled the logger is initialised at debug level.
    #[serde(default, alias = "debugLogging")]
    pub debug_logging: bool,
    /// Optional path of a file receiving log output.
    #[serde(default, alias = "logFile")]
    pub log_file: Option<String>,
}

fn default_fps() -> u32 {
    100
}

fn default_gravity_y() -> f64 {
    1.5
}

fn default_damping_x() -> f64 {
    0.95
}

fn default_damping_y() -> f64 {
    0.9
}

fn default_body_size() -> i32 {
    300
}

fn default_resample_ticks() -> u32 {
    8
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            gravity_x: 0.0,
            gravity_y: default_gravity_y(),
            damping_x: default_damping_x(),
            damping_y: default_damping_y(),
            body_width: default_body_size(),
            body_height: default_body_size(),
            resample_ticks: default_resample_ticks(),
            debug_logging: false,
            log_file: None,
        }
    }
}

impl PhysicsSettings {
    /// Load settings from `path`. A missing or empty file yields the defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content).with_context(|| format!("failed to parse settings file {path}"))
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("failed to write settings file {path}"))?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.fps == 0 {
            bail!("fps must be greater than zero");
        }
        if self.resample_ticks == 0 {
            bail!("resample_ticks must be greater than zero");
        }
        for (name, value) in [("damping_x", self.damping_x), ("damping_y", self.damping_y)] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{name} must be within [0, 1], got {value}");
            }
        }
        if !self.gravity_x.is_finite() || !self.gravity_y.is_finite() {
            bail!("gravity components must be finite");
        }
        if self.body_width <= 0 || self.body_height <= 0 {
            bail!(
                "body size must be positive, got {}x{}",
                self.body_width,
                self.body_height
            );
        }
        Ok(())
    }

    /// Wall time of one integrator tick, rounded down to whole milliseconds.
    pub fn tick_interval(&self) -> Duration {
        let millis = 1000 / u64::from(self.fps.max(1));
        Duration::from_millis(millis.max(1))
    }

    /// Minimum wall time between two drag position samples.
    pub fn resample_interval(&self) -> Duration {
        self.tick_interval() * self.resample_ticks
    }

    pub fn acceleration(&self) -> Coord {
        Coord::new(self.gravity_x, self.gravity_y)
    }
}
