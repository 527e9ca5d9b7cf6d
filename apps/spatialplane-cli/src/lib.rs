//! SpatialPlane app: loads the ship scene, wires the joystick, motion,
//! audio and tap highlight together, and runs scripted input through them.

pub mod app;
pub mod config;
pub mod script;

pub use app::{App, SHIP};
pub use config::AppConfig;
pub use script::{load_script, parse_script, parse_vec2};
