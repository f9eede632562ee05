pub mod capture;
pub mod engine;
pub mod registry;
pub mod service;

pub use capture::{CaptureEvent, CaptureMonitor, CaptureState};
pub use engine::{advance, Bounds, Integrator};
pub use registry::{Registry, SimulatedBody};
pub use service::WindowPhysics;
