// Host-side tests for drag input and damped scrolling.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod math {
    include!("../src/math.rs");
}
mod scroll {
    include!("../src/scroll.rs");
}

use constants::*;
use glam::Vec2;
use scroll::{DragController, ScrollState};

#[test]
fn offset_converges_to_target_without_overshoot() {
    let mut state = ScrollState {
        target: Vec2::new(500.0, -300.0),
        ..Default::default()
    };
    let mut last_dist = state.target.length();
    for _ in 0..600 {
        state.step(false, 1.0 / 60.0);
        let dist = (state.target - state.offset).length();
        assert!(dist <= last_dist + 1e-3, "overshoot past the target");
        last_dist = dist;
    }
    assert!(last_dist < 0.5, "did not converge: {last_dist}");
}

#[test]
fn damping_is_frame_rate_independent() {
    // Same wall-clock time at 30 Hz and 120 Hz must land on the same
    // offset; exponential damping depends on elapsed time, not tick count.
    let run = |hz: f32| {
        let mut state = ScrollState {
            target: Vec2::new(1000.0, 0.0),
            ..Default::default()
        };
        let steps = (2.0 * hz) as usize;
        for _ in 0..steps {
            state.step(false, 1.0 / hz);
        }
        state.offset
    };
    let coarse = run(30.0);
    let fine = run(120.0);
    assert!((coarse - fine).length() < 1.0, "{coarse} vs {fine}");
}

#[test]
fn drag_lambda_tracks_tighter_than_idle() {
    let mut idle = ScrollState {
        target: Vec2::new(100.0, 0.0),
        ..Default::default()
    };
    let mut dragged = idle;
    idle.step(false, 0.05);
    dragged.step(true, 0.05);
    assert!(dragged.offset.x > idle.offset.x);
}

#[test]
fn velocity_is_clamped() {
    let mut state = ScrollState::default();
    let mut drag = DragController::default();
    drag.begin(Vec2::ZERO, Vec2::ZERO, 0.0);
    // 4000px in 16ms is far past the clamp.
    drag.update(&mut state, Vec2::new(4000.0, -4000.0), 16.0);
    assert_eq!(state.velocity, Vec2::new(VELOCITY_MAX, -VELOCITY_MAX));
}

#[test]
fn timing_gaps_leave_velocity_untouched() {
    let mut state = ScrollState::default();
    let mut drag = DragController::default();
    drag.begin(Vec2::ZERO, Vec2::ZERO, 0.0);
    drag.update(&mut state, Vec2::new(16.0, 0.0), 16.0);
    let sampled = state.velocity;
    assert!(sampled.x > 0.0);

    // Tab-switch sized gap: the move still retargets the offset but must
    // not produce a huge velocity spike.
    drag.update(&mut state, Vec2::new(300.0, 0.0), 16.0 + 5000.0);
    assert_eq!(state.velocity, sampled);
    assert_eq!(state.target, Vec2::new(300.0, 0.0));

    // Zero-dt duplicate event is ignored for sampling too.
    drag.update(&mut state, Vec2::new(310.0, 0.0), 16.0 + 5000.0);
    assert_eq!(state.velocity, sampled);
}

#[test]
fn velocity_scales_to_the_reference_frame() {
    let mut state = ScrollState::default();
    let mut drag = DragController::default();
    drag.begin(Vec2::ZERO, Vec2::ZERO, 0.0);
    // 10px over 32ms = 5px per 16ms frame.
    drag.update(&mut state, Vec2::new(10.0, 0.0), 32.0);
    assert!((state.velocity.x - 5.0).abs() < 1e-4);
}

#[test]
fn drag_target_is_absolute_not_accumulated() {
    let mut state = ScrollState {
        offset: Vec2::new(50.0, 50.0),
        target: Vec2::new(50.0, 50.0),
        ..Default::default()
    };
    let mut drag = DragController::default();
    drag.begin(Vec2::new(200.0, 200.0), state.offset, 0.0);

    // Jitter back and forth; the target must equal anchor + net movement,
    // with no drift from repeated deltas.
    let mut t = 0.0;
    for _ in 0..100 {
        t += 16.0;
        drag.update(&mut state, Vec2::new(210.0, 200.0), t);
        t += 16.0;
        drag.update(&mut state, Vec2::new(200.0, 200.0), t);
    }
    assert_eq!(state.target, Vec2::new(50.0, 50.0));
    drag.update(&mut state, Vec2::new(230.0, 190.0), t + 16.0);
    assert_eq!(state.target, Vec2::new(80.0, 40.0));
}

#[test]
fn release_resets_velocity_but_keeps_settling() {
    let mut state = ScrollState::default();
    let mut drag = DragController::default();
    drag.begin(Vec2::ZERO, Vec2::ZERO, 0.0);
    drag.update(&mut state, Vec2::new(120.0, 0.0), 16.0);
    assert!(state.velocity.x > 0.0);

    drag.end(&mut state);
    assert!(!drag.dragging);
    assert_eq!(state.velocity, Vec2::ZERO);
    assert_eq!(state.target, Vec2::new(120.0, 0.0));

    // The offset still glides toward where the drag left the target.
    let before = state.offset.x;
    state.step(false, 1.0 / 60.0);
    assert!(state.offset.x > before);
}

#[test]
fn travel_accumulates_total_pointer_path() {
    let mut state = ScrollState::default();
    let mut drag = DragController::default();
    drag.begin(Vec2::ZERO, Vec2::ZERO, 0.0);
    drag.update(&mut state, Vec2::new(3.0, 0.0), 16.0);
    drag.update(&mut state, Vec2::new(0.0, 0.0), 32.0);
    // Net displacement is zero but 6px of travel suppresses the click.
    assert!((drag.travel_px - 6.0).abs() < 1e-4);
    assert!(drag.travel_px > CLICK_DRAG_SUPPRESS_PX);
}

#[test]
fn settle_snaps_to_target() {
    let mut state = ScrollState {
        target: Vec2::new(10.0, 20.0),
        velocity: Vec2::new(5.0, 5.0),
        ..Default::default()
    };
    state.settle();
    assert_eq!(state.offset, state.target);
    assert_eq!(state.velocity, Vec2::ZERO);
}
