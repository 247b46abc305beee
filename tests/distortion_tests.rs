// Host-side tests for the barrel-distortion controller.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod math {
    include!("../src/math.rs");
}
mod distortion {
    include!("../src/distortion.rs");
}

use constants::*;
use distortion::DistortionState;

#[test]
fn starts_at_idle_levels() {
    let state = DistortionState::default();
    assert_eq!(state.strength, DISTORTION_IDLE);
    assert_eq!(state.aberration, ABERRATION_IDLE);
}

#[test]
fn drag_raises_both_targets() {
    let mut state = DistortionState::default();
    state.set_dragging(true);
    for _ in 0..240 {
        state.update(1.0 / 60.0, 0.0);
    }
    assert!((state.strength - DISTORTION_DRAG).abs() < 1e-3);
    assert!((state.aberration - ABERRATION_DRAG).abs() < 1e-3);
}

#[test]
fn release_settles_back_to_idle() {
    let mut state = DistortionState::default();
    state.set_dragging(true);
    for _ in 0..240 {
        state.update(1.0 / 60.0, 0.0);
    }
    state.set_dragging(false);
    for _ in 0..240 {
        state.update(1.0 / 60.0, 0.0);
    }
    assert!((state.strength - DISTORTION_IDLE).abs() < 1e-3);
    assert!((state.aberration - ABERRATION_IDLE).abs() < 1e-3);
}

#[test]
fn approach_is_damped_not_instant() {
    let mut state = DistortionState::default();
    state.set_dragging(true);
    state.update(1.0 / 60.0, 0.0);
    assert!(state.strength > DISTORTION_IDLE);
    assert!(state.strength < DISTORTION_DRAG);

    // One frame moves by the exponential-decay fraction exactly.
    let expected = DISTORTION_IDLE
        + (DISTORTION_DRAG - DISTORTION_IDLE) * (1.0 - (-DISTORTION_LAMBDA / 60.0).exp());
    assert!((state.strength - expected).abs() < 1e-5);
}

#[test]
fn scroll_speed_adds_a_bounded_boost() {
    let mut fast = DistortionState::default();
    let mut insane = DistortionState::default();
    for _ in 0..240 {
        fast.update(1.0 / 60.0, VELOCITY_MAX);
        insane.update(1.0 / 60.0, VELOCITY_MAX * 100.0);
    }
    assert!((fast.strength - (DISTORTION_IDLE + DISTORTION_SPEED_BOOST)).abs() < 1e-3);
    // The normalized speed is clamped; absurd velocities add nothing more.
    assert!((insane.strength - fast.strength).abs() < 1e-4);
    // Aberration ignores speed entirely.
    assert!((fast.aberration - ABERRATION_IDLE).abs() < 1e-3);
}
