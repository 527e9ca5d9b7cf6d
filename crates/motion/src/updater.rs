use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::heading::{compose, heading_between, heading_of};

/// Divisor mapping joystick pixels to world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoystickScale(pub f32);

impl Default for JoystickScale {
    fn default() -> Self {
        Self(10.0)
    }
}

impl JoystickScale {
    /// Joystick x drives world x, joystick y drives world z; y stays on the plane.
    pub fn to_world(self, input: Vec2) -> Vec3 {
        Vec3::new(input.x / self.0, 0.0, input.y / self.0)
    }
}

/// What heading a zero-length move produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroDelta {
    /// `atan2(0, 0) = 0`: the object snaps to face +Z.
    #[default]
    Reset,
    /// Keep the heading already stored in the current transform.
    Hold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    pub scale: JoystickScale,
    pub zero_delta: ZeroDelta,
    /// Give the audio source the full rotate+translate transform instead of
    /// the translation alone.
    pub orient_audio: bool,
}

/// Result of one input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionUpdate {
    pub position: Vec3,
    pub heading: f32,
    /// Rotate-then-translate transform for the scene node.
    pub transform: Mat4,
    /// Transform for the spatial audio source.
    pub audio_transform: Mat4,
}

/// Stateless per-event transform computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformUpdater {
    config: UpdaterConfig,
}

impl TransformUpdater {
    pub fn new(config: UpdaterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Target position for a joystick vector.
    pub fn target(&self, input: Vec2) -> Vec3 {
        self.config.scale.to_world(input)
    }

    /// Compute the next transform from the object's current transform and a
    /// new joystick vector.
    pub fn update(&self, current: &Mat4, input: Vec2) -> MotionUpdate {
        self.update_towards(current, self.target(input))
    }

    /// Compute the next transform for an explicit world-space target.
    pub fn update_towards(&self, current: &Mat4, target: Vec3) -> MotionUpdate {
        let from = current.w_axis.truncate();
        let delta = target - from;
        let stationary = delta.x == 0.0 && delta.z == 0.0;
        let heading = match self.config.zero_delta {
            ZeroDelta::Hold if stationary => heading_of(current),
            _ => heading_between(from, target),
        };

        let transform = compose(heading, target);
        let audio_transform = if self.config.orient_audio {
            transform
        } else {
            Mat4::from_translation(target)
        };

        tracing::debug!(x = target.x, z = target.z, heading, "motion update");

        MotionUpdate {
            position: target,
            heading,
            transform,
            audio_transform,
        }
    }
}
