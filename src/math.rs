// Frame-rate independent smoothing helpers shared across the crate.

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Exponential-decay damping of `current` toward `target`.
///
/// Convergence depends only on elapsed wall-clock time, not frame rate:
/// iterating with any subdivision of the same total `dt` lands on the same
/// value. The result never overshoots `target`.
#[inline]
pub fn damp(current: f32, target: f32, lambda: f32, dt: f32) -> f32 {
    lerp(current, target, 1.0 - (-lambda * dt).exp())
}
