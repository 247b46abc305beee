// Damped controller for the post stage's two scalar uniforms.
//
// Mirrors the scroll damping math: a drag raises the barrel distortion and
// chromatic aberration targets, releasing settles them back, and scroll
// speed adds a small boost in either state.

use crate::constants::{
    ABERRATION_DRAG, ABERRATION_IDLE, DISTORTION_DRAG, DISTORTION_IDLE, DISTORTION_LAMBDA,
    DISTORTION_SPEED_BOOST, VELOCITY_MAX,
};
use crate::math;

#[derive(Debug, Clone, Copy)]
pub struct DistortionState {
    pub strength: f32,
    pub aberration: f32,
    target_strength: f32,
    target_aberration: f32,
}

impl Default for DistortionState {
    fn default() -> Self {
        Self {
            strength: DISTORTION_IDLE,
            aberration: ABERRATION_IDLE,
            target_strength: DISTORTION_IDLE,
            target_aberration: ABERRATION_IDLE,
        }
    }
}

impl DistortionState {
    pub fn set_dragging(&mut self, dragging: bool) {
        if dragging {
            self.target_strength = DISTORTION_DRAG;
            self.target_aberration = ABERRATION_DRAG;
        } else {
            self.target_strength = DISTORTION_IDLE;
            self.target_aberration = ABERRATION_IDLE;
        }
    }

    /// Damp toward the current targets. `speed` is the scroll velocity
    /// magnitude; it contributes a small normalized boost on top of the
    /// drag/idle target.
    pub fn update(&mut self, dt_sec: f32, speed: f32) {
        let boost = (speed / VELOCITY_MAX).clamp(0.0, 1.0) * DISTORTION_SPEED_BOOST;
        self.strength = math::damp(
            self.strength,
            self.target_strength + boost,
            DISTORTION_LAMBDA,
            dt_sec,
        );
        self.aberration = math::damp(
            self.aberration,
            self.target_aberration,
            DISTORTION_LAMBDA,
            dt_sec,
        );
    }
}
