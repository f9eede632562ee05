use falling_windows::logging;
use falling_windows::physics::WindowPhysics;
use falling_windows::settings::{PhysicsSettings, SETTINGS_FILE};
use falling_windows::window_manager::default_backend;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| SETTINGS_FILE.to_string());
    let settings = PhysicsSettings::load(&path)?;
    logging::init(settings.debug_logging, settings.log_file.as_ref().map(PathBuf::from));
    settings.validate()?;
    tracing::info!(settings = %path, "loaded settings");

    let backend = default_backend()?;
    WindowPhysics::new(settings, backend).run()
}
