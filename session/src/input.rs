//! Latches held controls and pointer motion between simulation ticks.

use gloom_core::{Control, InputFrame};

/// Accumulates input reported by the presentation layer until a tick takes it.
#[derive(Clone, Debug, Default)]
pub struct InputLatch {
    held: InputFrame,
}

impl InputLatch {
    /// Records that a control went down.
    pub fn press(&mut self, control: Control) {
        *self.slot(control) = true;
    }

    /// Records that a control was released.
    pub fn release(&mut self, control: Control) {
        *self.slot(control) = false;
    }

    /// Adds horizontal pointer motion to the pending delta.
    pub fn pointer_motion(&mut self, dx: f32) {
        if dx.is_finite() {
            self.held.pointer_dx += dx;
        }
    }

    /// Returns the latched frame and clears the pointer delta so motion is
    /// consumed exactly once. Held controls stay latched.
    pub fn take_frame(&mut self) -> InputFrame {
        let frame = self.held;
        self.held.pointer_dx = 0.0;
        frame
    }

    /// Drops pending pointer motion without consuming a frame.
    pub fn discard_motion(&mut self) {
        self.held.pointer_dx = 0.0;
    }

    /// Releases every control and drops pending motion.
    pub fn clear(&mut self) {
        self.held = InputFrame::default();
    }

    fn slot(&mut self, control: Control) -> &mut bool {
        match control {
            Control::Forward => &mut self.held.forward,
            Control::Backward => &mut self.held.backward,
            Control::StrafeLeft => &mut self.held.strafe_left,
            Control::StrafeRight => &mut self.held.strafe_right,
            Control::TurnLeft => &mut self.held.turn_left,
            Control::TurnRight => &mut self.held.turn_right,
        }
    }
}
