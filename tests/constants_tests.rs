// Host-side tests for constants and their mathematical relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    // Geometry
    assert!(CELL_SIZE_PX > 0.0);
    assert!(POOL_BUFFER_CELLS >= 1);
    assert!(BORDER_WIDTH_PX > 0.0 && BORDER_WIDTH_PX < CELL_SIZE_PX);
    assert!(ORNAMENT_CELL_FRACTION > 0.0 && ORNAMENT_CELL_FRACTION < 1.0);

    // Time constants should be positive
    assert!(FRAME_DT_MAX_SEC > 0.0);
    assert!(FADE_OUT_SEC > 0.0);
    assert!(FADE_IN_SEC > 0.0);
    assert!(FADE_IN_DELAY_SEC >= 0.0);
    assert!(FOCUS_TRANSITION_SEC > 0.0);

    // Damping rates should be positive
    assert!(SCROLL_DRAG_LAMBDA > 0.0);
    assert!(SCROLL_IDLE_LAMBDA > 0.0);
    assert!(DISTORTION_LAMBDA > 0.0);
    assert!(ORNAMENT_RETURN_LAMBDA > 0.0);

    // Velocity sampling limits
    assert!(VELOCITY_SAMPLE_MAX_MS > 0.0);
    assert!(VELOCITY_FRAME_MS > 0.0);
    assert!(VELOCITY_MAX > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn interaction_relationships_hold() {
    // Dragging must respond faster than idle settling
    assert!(SCROLL_DRAG_LAMBDA > SCROLL_IDLE_LAMBDA);

    // Drag state intensifies the post stage
    assert!(DISTORTION_DRAG > DISTORTION_IDLE);
    assert!(ABERRATION_DRAG > ABERRATION_IDLE);

    // Click suppression must trigger well below one cell of travel
    assert!(CLICK_DRAG_SUPPRESS_PX > 0.0);
    assert!(CLICK_DRAG_SUPPRESS_PX < CELL_SIZE_PX);

    // Exit transition outlives the content fade that runs inside it
    assert!(FOCUS_TRANSITION_SEC >= FADE_OUT_SEC);

    // The camera sits in front of the grid plane
    assert!(CAMERA_Z > GRID_PLANE_Z);
    assert!(CAMERA_FOV_DEG > 0.0 && CAMERA_FOV_DEG < 180.0);
}

#[test]
fn border_color_is_normalized() {
    for channel in BORDER_COLOR {
        assert!((0.0..=1.0).contains(&channel));
    }
}

#[test]
fn label_atlas_holds_a_pool_of_labels() {
    // A few dozen short monospace labels must fit one atlas page.
    assert!(LABEL_ATLAS_SIZE >= 512);
    assert!(LABEL_ATLAS_SIZE.is_power_of_two());
}
