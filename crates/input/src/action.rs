use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A high-level action fed to the app loop.
///
/// Scripts and live input both reduce to this set, so the scene and audio
/// logic never see where an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Drag the joystick thumb to this offset from its center, in points.
    Steer(Vec2),
    /// Lift the finger off the joystick.
    Release,
    /// Tap the scene view at this screen location, in points.
    Tap(Vec2),
    /// Let this many seconds of animation time pass.
    Wait(f32),
}
