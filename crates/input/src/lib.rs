//! Input: the on-screen joystick and the actions the app consumes.
//!
//! # Invariants
//! - The app consumes [`Action`]s and joystick vectors, never raw touches.
//! - The joystick publishes a vector only when its value changes.

pub mod action;
pub mod channel;
pub mod joystick;

pub use action::Action;
pub use channel::{JoystickReceiver, JoystickSender, joystick_channel};
pub use joystick::{Joystick, JoystickShape};
