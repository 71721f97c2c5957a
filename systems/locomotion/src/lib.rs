#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that converts latched player input into movement commands.

use gloom_core::{
    tuning::{KEY_TURN_RATE, POINTER_SENSITIVITY},
    Command, InputFrame, Stride,
};

/// Locomotion system translating held controls into turn and stride commands.
#[derive(Debug)]
pub struct Locomotion {
    sensitivity: f32,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self {
            sensitivity: POINTER_SENSITIVITY,
        }
    }
}

impl Locomotion {
    /// Creates a locomotion system with the default pointer sensitivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the radians turned per pixel of pointer motion.
    #[must_use]
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Emits the turn for this tick followed by one step per held stride.
    ///
    /// Strides are emitted in [`Stride::ALL`] order and the world applies them
    /// against the position produced by the previous one.
    pub fn handle(&mut self, input: &InputFrame, out: &mut Vec<Command>) {
        let mut radians = input.pointer_dx * self.sensitivity;
        if input.turn_left {
            radians -= KEY_TURN_RATE;
        }
        if input.turn_right {
            radians += KEY_TURN_RATE;
        }
        if radians != 0.0 && radians.is_finite() {
            out.push(Command::TurnPlayer { radians });
        }

        out.extend(
            Stride::ALL
                .into_iter()
                .filter(|&stride| input.strides(stride))
                .map(|stride| Command::StepPlayer { stride }),
        );
    }
}
