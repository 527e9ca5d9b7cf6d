use crossbeam::channel::{self, Receiver, Sender, TryIter};
use glam::Vec2;

/// Create a connected joystick sender/receiver pair.
pub fn joystick_channel() -> (JoystickSender, JoystickReceiver) {
    let (tx, rx) = channel::unbounded();
    (JoystickSender(tx), JoystickReceiver(rx))
}

/// Publishing half, held by the joystick.
#[derive(Debug, Clone)]
pub struct JoystickSender(Sender<Vec2>);

impl JoystickSender {
    /// Publish a new joystick vector. Returns `false` once the receiver is gone.
    pub fn publish(&self, xy: Vec2) -> bool {
        self.0.send(xy).is_ok()
    }
}

/// Consuming half, held by whatever applies the motion.
#[derive(Debug)]
pub struct JoystickReceiver(Receiver<Vec2>);

impl JoystickReceiver {
    /// Every pending vector, oldest first.
    pub fn try_iter(&self) -> TryIter<'_, Vec2> {
        self.0.try_iter()
    }

    /// Drain the queue and keep only the newest vector.
    pub fn latest(&self) -> Option<Vec2> {
        self.0.try_iter().last()
    }

    pub fn pending(&self) -> usize {
        self.0.len()
    }
}
