// Host-side tests for easing and instance fades.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod tween {
    include!("../src/tween.rs");
}

use constants::*;
use tween::{ease, Ease, Fader, Tween};

const EPS: f32 = 1e-5;

#[test]
fn easing_hits_its_endpoints() {
    for e in [Ease::Power2In, Ease::Power2Out, Ease::Power2InOut] {
        assert!((ease(e, 0.0) - 0.0).abs() < EPS);
        assert!((ease(e, 1.0) - 1.0).abs() < EPS);
        assert!((ease(e, 0.5) - 0.5).abs() <= 0.25);
        // Out of range input is clamped, not extrapolated.
        assert_eq!(ease(e, -1.0), ease(e, 0.0));
        assert_eq!(ease(e, 2.0), ease(e, 1.0));
    }
}

#[test]
fn easing_shapes_differ_at_the_quarter_mark() {
    assert!(ease(Ease::Power2In, 0.25) < 0.25);
    assert!(ease(Ease::Power2Out, 0.25) > 0.25);
}

#[test]
fn tween_interpolates_and_completes() {
    let mut t = Tween::new(2.0, 6.0, 1.0, Ease::Power2InOut);
    assert!((t.value() - 2.0).abs() < EPS);
    t.step(0.5);
    assert!((t.value() - 4.0).abs() < 1e-3);
    assert!(!t.done());
    t.step(0.6);
    assert!((t.value() - 6.0).abs() < EPS);
    assert!(t.done());
}

#[test]
fn delay_holds_the_start_value() {
    let mut t = Tween::new(0.0, 1.0, 1.0, Ease::Power2In).with_delay(0.5);
    assert_eq!(t.step(0.25), 0.0);
    assert_eq!(t.step(0.24), 0.0);
    assert!(t.step(0.5) > 0.0);
}

#[test]
fn fader_defaults_to_fully_visible() {
    let fader = Fader::default();
    assert_eq!(fader.value(), 1.0);
}

#[test]
fn fade_out_reaches_zero_in_half_a_second() {
    let mut fader = Fader::default();
    fader.fade_out();
    let mut elapsed = 0.0;
    while elapsed < FADE_OUT_SEC {
        fader.step(1.0 / 60.0);
        elapsed += 1.0 / 60.0;
    }
    assert!(fader.value() < 0.01, "still visible: {}", fader.value());
}

#[test]
fn fade_in_waits_out_its_delay() {
    let mut fader = Fader::default();
    fader.fade_out();
    for _ in 0..60 {
        fader.step(1.0 / 60.0);
    }
    fader.fade_in();

    // During the delay the value must not move.
    let mut elapsed = 0.0;
    while elapsed + 1.0 / 60.0 < FADE_IN_DELAY_SEC {
        assert!(fader.step(1.0 / 60.0) < 0.01);
        elapsed += 1.0 / 60.0;
    }
    // After delay + duration it is fully visible again.
    for _ in 0..((FADE_IN_SEC * 60.0) as usize + 4) {
        fader.step(1.0 / 60.0);
    }
    assert!((fader.value() - 1.0).abs() < EPS);
}

#[test]
fn interrupted_fade_restarts_from_current_value() {
    let mut fader = Fader::default();
    fader.fade_out();
    fader.step(FADE_OUT_SEC / 2.0);
    let mid = fader.value();
    assert!(mid > 0.0 && mid < 1.0);

    // Fading out again mid-flight starts at `mid`, not at 1.0.
    fader.fade_out();
    assert_eq!(fader.step(0.0), mid);
}
