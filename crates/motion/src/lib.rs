//! Motion kernel: maps a 2D joystick vector to a planar position, a heading
//! about +Y and the combined transform of the moving object.
//!
//! # Invariants
//! - The translation column of every produced transform equals the target.
//! - Heading is `atan2(dx, dz)` of the move from the previous position.
//! - Updates are pure: the same current transform and input give the same output.

pub mod heading;
pub mod updater;

pub use heading::{compose, heading_between, heading_of};
pub use updater::{JoystickScale, MotionUpdate, TransformUpdater, UpdaterConfig, ZeroDelta};
