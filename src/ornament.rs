//! Per-cell 3-D ornament state.
//!
//! The ornament is an opaque sprite tracked to its cell: the synchronizer
//! writes a target position every frame, hover spins it up, and leaving
//! hover damps the rotation back to rest. Until the shared sprite asset has
//! loaded, `update` is a no-op and the ornament draws nothing.

use crate::constants::{ORNAMENT_RETURN_LAMBDA, ORNAMENT_SPIN_SPEED};
use crate::math;
use crate::tween::Fader;
use glam::Vec2;

/// Greyscale shade picked per ornament: a coin flip between near-black
/// and mid-grey.
pub fn random_shade(roll: f32) -> f32 {
    if roll > 0.5 {
        0.025
    } else {
        0.45
    }
}

#[derive(Debug, Clone)]
pub struct Ornament {
    pub position: Vec2,
    pub rotation: f32,
    pub shade: f32,
    pub hovered: bool,
    pub loaded: bool,
    pub fader: Fader,
}

impl Ornament {
    pub fn new(shade: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            shade,
            hovered: false,
            loaded: false,
            fader: Fader::default(),
        }
    }

    /// World-plane position write; takes effect immediately.
    pub fn set_target_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn set_loaded(&mut self) {
        self.loaded = true;
    }

    pub fn fade_out(&mut self) {
        self.fader.fade_out();
    }

    pub fn fade_in(&mut self) {
        self.fader.fade_in();
    }

    pub fn opacity(&self) -> f32 {
        self.fader.value()
    }

    /// Advance spin and fade. No-op until the asset is loaded.
    pub fn update(&mut self, dt_sec: f32) {
        if !self.loaded {
            return;
        }
        if self.hovered {
            self.rotation += ORNAMENT_SPIN_SPEED;
        } else {
            self.rotation = math::damp(self.rotation, 0.0, ORNAMENT_RETURN_LAMBDA, dt_sec);
        }
        self.fader.step(dt_sec);
    }
}
