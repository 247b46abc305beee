// Drag input → target offset, and per-frame damped relaxation toward it.
//
// Pointer handlers feed [`DragController`] synchronously; the frame loop
// calls [`ScrollState::step`] once per tick. The target offset is absolute
// (`pointer − drag_start`), so repeated move events cannot drift.

use crate::constants::{
    SCROLL_DRAG_LAMBDA, SCROLL_IDLE_LAMBDA, VELOCITY_FRAME_MS, VELOCITY_MAX,
    VELOCITY_SAMPLE_MAX_MS,
};
use crate::math;
use glam::Vec2;

/// Rendered offset, authoritative target and instantaneous drag velocity.
///
/// `velocity` feeds visual effects only; it is never integrated into the
/// offset (drag release does not fling).
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollState {
    pub offset: Vec2,
    pub target: Vec2,
    pub velocity: Vec2,
}

impl ScrollState {
    /// Relax `offset` toward `target` with exponential decay, one axis at a
    /// time. `dt` is expected pre-clamped by the frame loop.
    pub fn step(&mut self, dragging: bool, dt_sec: f32) {
        let lambda = if dragging {
            SCROLL_DRAG_LAMBDA
        } else {
            SCROLL_IDLE_LAMBDA
        };
        self.offset.x = math::damp(self.offset.x, self.target.x, lambda, dt_sec);
        self.offset.y = math::damp(self.offset.y, self.target.y, lambda, dt_sec);
    }

    /// Snap the rendered offset onto the target and drop velocity.
    pub fn settle(&mut self) {
        self.offset = self.target;
        self.velocity = Vec2::ZERO;
    }
}

/// Converts pointer events into target offset and clamped velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragController {
    pub dragging: bool,
    drag_start: Vec2,
    last_pointer: Vec2,
    last_time_ms: f64,
    /// Pointer travel since `begin`, used to suppress click-after-drag.
    pub travel_px: f32,
}

impl DragController {
    /// Pointer-down: capture the anchor so the target stays absolute.
    pub fn begin(&mut self, pointer: Vec2, current_offset: Vec2, now_ms: f64) {
        self.dragging = true;
        self.drag_start = pointer - current_offset;
        self.last_pointer = pointer;
        self.last_time_ms = now_ms;
        self.travel_px = 0.0;
    }

    /// Pointer-move while dragging. Velocity is sampled only for deltas in
    /// `(0, 100ms]`; anything else is a gap and leaves velocity untouched.
    /// The target offset is always updated.
    pub fn update(&mut self, scroll: &mut ScrollState, pointer: Vec2, now_ms: f64) {
        if !self.dragging {
            return;
        }
        let dt_ms = now_ms - self.last_time_ms;
        if dt_ms > 0.0 && dt_ms <= VELOCITY_SAMPLE_MAX_MS {
            let scale = VELOCITY_FRAME_MS / dt_ms as f32;
            let raw = (pointer - self.last_pointer) * scale;
            scroll.velocity = raw.clamp(Vec2::splat(-VELOCITY_MAX), Vec2::splat(VELOCITY_MAX));
        }
        self.travel_px += (pointer - self.last_pointer).length();
        self.last_pointer = pointer;
        self.last_time_ms = now_ms;
        scroll.target = pointer - self.drag_start;
    }

    /// Pointer-up: velocity resets immediately, the damped offset keeps
    /// settling toward whatever target the drag left behind.
    pub fn end(&mut self, scroll: &mut ScrollState) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        scroll.velocity = Vec2::ZERO;
    }
}
