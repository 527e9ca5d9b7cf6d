use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::channel::JoystickSender;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoystickShape {
    #[default]
    Circle,
    Rect,
}

/// On-screen joystick.
///
/// Locations are relative to the joystick's resting center, y grows downward.
/// The published vector is the thumb offset from the current center, clamped
/// to the shape.
#[derive(Debug)]
pub struct Joystick {
    pub diameter: f32,
    pub shape: JoystickShape,
    /// When false, the first touch of a drag becomes the new center.
    pub locks_in_place: bool,
    origin: Vec2,
    xy_point: Vec2,
    dragging: bool,
    sender: Option<JoystickSender>,
}

impl Joystick {
    pub const DEFAULT_DIAMETER: f32 = 150.0;

    pub fn new(diameter: f32, shape: JoystickShape) -> Self {
        Self {
            diameter,
            shape,
            locks_in_place: true,
            origin: Vec2::ZERO,
            xy_point: Vec2::ZERO,
            dragging: false,
            sender: None,
        }
    }

    pub fn with_sender(mut self, sender: JoystickSender) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn with_locks_in_place(mut self, locks: bool) -> Self {
        self.locks_in_place = locks;
        self
    }

    pub fn radius(&self) -> f32 {
        self.diameter / 2.0
    }

    /// Current thumb offset.
    pub fn xy_point(&self) -> Vec2 {
        self.xy_point
    }

    /// Move the finger to `location`. Returns the clamped thumb offset.
    pub fn drag(&mut self, location: Vec2) -> Vec2 {
        if !self.dragging {
            self.dragging = true;
            if !self.locks_in_place {
                self.origin = location;
            }
        }
        let offset = self.clamp(location - self.origin);
        self.set_point(offset);
        offset
    }

    /// Lift the finger: the thumb springs back to the center.
    pub fn release(&mut self) {
        self.dragging = false;
        self.origin = Vec2::ZERO;
        self.set_point(Vec2::ZERO);
    }

    fn clamp(&self, offset: Vec2) -> Vec2 {
        let r = self.radius();
        match self.shape {
            JoystickShape::Circle => offset.clamp_length_max(r),
            JoystickShape::Rect => offset.clamp(Vec2::splat(-r), Vec2::splat(r)),
        }
    }

    fn set_point(&mut self, xy: Vec2) {
        if xy == self.xy_point {
            return;
        }
        self.xy_point = xy;
        tracing::trace!(x = xy.x, y = xy.y, "joystick moved");
        if let Some(sender) = &self.sender {
            if !sender.publish(xy) {
                tracing::debug!("joystick receiver dropped; detaching");
                self.sender = None;
            }
        }
    }
}

impl Default for Joystick {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIAMETER, JoystickShape::Circle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::joystick_channel;
    use approx::assert_relative_eq;

    #[test]
    fn drag_inside_radius_passes_through() {
        let mut j = Joystick::default();
        let xy = j.drag(Vec2::new(30.0, -20.0));
        assert_eq!(xy, Vec2::new(30.0, -20.0));
        assert_eq!(j.xy_point(), xy);
    }

    #[test]
    fn locations_are_relative_to_center() {
        let mut j = Joystick::default();
        assert_eq!(j.drag(Vec2::ZERO), Vec2::ZERO);
        assert_eq!(j.drag(Vec2::new(-75.0, 0.0)), Vec2::new(-75.0, 0.0));
        assert_eq!(j.drag(Vec2::new(0.0, 75.0)), Vec2::new(0.0, 75.0));
    }

    #[test]
    fn circle_clamps_to_radius() {
        let mut j = Joystick::default();
        let xy = j.drag(Vec2::new(300.0, 400.0));
        assert_relative_eq!(xy.length(), 75.0, epsilon = 1e-4);
        assert_relative_eq!(xy.x, 45.0, epsilon = 1e-4);
        assert_relative_eq!(xy.y, 60.0, epsilon = 1e-4);
    }

    #[test]
    fn rect_clamps_per_axis() {
        let mut j = Joystick::new(150.0, JoystickShape::Rect);
        let xy = j.drag(Vec2::new(300.0, -10.0));
        assert_eq!(xy, Vec2::new(75.0, -10.0));
    }

    #[test]
    fn release_recenters() {
        let mut j = Joystick::default();
        j.drag(Vec2::new(10.0, 0.0));
        j.release();
        assert_eq!(j.xy_point(), Vec2::ZERO);
    }

    #[test]
    fn floating_joystick_centers_on_first_touch() {
        let mut j = Joystick::default().with_locks_in_place(false);
        assert_eq!(j.drag(Vec2::new(10.0, 10.0)), Vec2::ZERO);
        assert_eq!(j.drag(Vec2::new(20.0, 10.0)), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn publishes_only_on_change() {
        let (tx, rx) = joystick_channel();
        let mut j = Joystick::default().with_sender(tx);
        let at = Vec2::new(5.0, 5.0);
        j.drag(at);
        j.drag(at);
        j.drag(at);
        j.release();
        j.release();
        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(got, vec![Vec2::new(5.0, 5.0), Vec2::ZERO]);
    }

    #[test]
    fn survives_dropped_receiver() {
        let (tx, rx) = joystick_channel();
        let mut j = Joystick::default().with_sender(tx);
        drop(rx);
        j.drag(Vec2::new(1.0, 0.0));
        assert_eq!(j.xy_point(), Vec2::new(1.0, 0.0));
    }
}
