pub mod geometry;
pub mod logging;
pub mod physics;
pub mod settings;
pub mod win_util;
pub mod window_manager;
