// Small per-frame interpolation tasks (fades, transition countdowns).
//
// Stepped against the same clock as the scroll damping; tweens animate
// visual properties only and never touch pool or offset state.

use crate::constants::{FADE_IN_DELAY_SEC, FADE_IN_SEC, FADE_OUT_SEC};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Power2In,
    Power2Out,
    Power2InOut,
}

/// Normalized easing curve, `t` in `[0, 1]`.
pub fn ease(e: Ease, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Ease::Power2In => t * t,
        Ease::Power2Out => 1.0 - (1.0 - t) * (1.0 - t),
        Ease::Power2InOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - 2.0 * (1.0 - t) * (1.0 - t)
            }
        }
    }
}

/// Glides a value from `from` to `to` over `duration`, after `delay`.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    delay: f32,
    elapsed: f32,
    ease: Ease,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.max(1e-6),
            delay: 0.0,
            elapsed: 0.0,
            ease,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Advance by `dt` seconds and return the current value.
    pub fn step(&mut self, dt: f32) -> f32 {
        self.elapsed += dt;
        self.value()
    }

    pub fn value(&self) -> f32 {
        let active = self.elapsed - self.delay;
        if active <= 0.0 {
            return self.from;
        }
        let t = (active / self.duration).min(1.0);
        self.from + (self.to - self.from) * ease(self.ease, t)
    }

    pub fn done(&self) -> bool {
        self.elapsed - self.delay >= self.duration
    }
}

/// Opacity lifecycle of a synchronized instance around focus transitions.
#[derive(Debug, Clone, Copy)]
pub struct Fader {
    value: f32,
    tween: Option<Tween>,
}

impl Default for Fader {
    fn default() -> Self {
        Self {
            value: 1.0,
            tween: None,
        }
    }
}

impl Fader {
    pub fn fade_out(&mut self) {
        self.tween = Some(Tween::new(self.value, 0.0, FADE_OUT_SEC, Ease::Power2Out));
    }

    pub fn fade_in(&mut self) {
        self.tween = Some(
            Tween::new(self.value, 1.0, FADE_IN_SEC, Ease::Power2In).with_delay(FADE_IN_DELAY_SEC),
        );
    }

    pub fn step(&mut self, dt: f32) -> f32 {
        if let Some(tween) = &mut self.tween {
            self.value = tween.step(dt);
            if tween.done() {
                self.tween = None;
            }
        }
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}
