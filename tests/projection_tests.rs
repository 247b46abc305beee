// Host-side tests for the screen ↔ world plane projection.

#![allow(dead_code)]
mod projection {
    include!("../src/projection.rs");
}

use glam::Vec2;
use projection::{Projector, Rect};

const EPS: f32 = 1e-4;

fn reference() -> (Projector, Rect) {
    (
        Projector::new(50.0, 1024.0 / 768.0, 5.0),
        Rect::new(0.0, 0.0, 1024.0, 768.0),
    )
}

#[test]
fn frustum_height_follows_fov_and_distance() {
    let (p, _) = reference();
    // h = 2 * tan(fov/2) * d with fov 50° and the plane 5 units away.
    let expected_h = 2.0 * (50.0_f32.to_radians() * 0.5).tan() * 5.0;
    let size = p.frustum_size(0.0);
    assert!((size.y - expected_h).abs() < EPS);
    assert!((size.x - expected_h * p.aspect).abs() < EPS);

    // Closer plane, bigger distance is the only variable.
    let near = p.frustum_size(2.0);
    assert!((near.y - expected_h * (3.0 / 5.0)).abs() < EPS);
}

#[test]
fn screen_center_maps_to_world_origin() {
    let (p, container) = reference();
    let world = p.screen_to_world(Vec2::new(512.0, 384.0), container, 0.0);
    assert!(world.length() < EPS);
}

#[test]
fn screen_y_down_is_world_y_down() {
    let (p, container) = reference();
    let below_center = p.screen_to_world(Vec2::new(512.0, 700.0), container, 0.0);
    assert!(below_center.y < 0.0);
    let right_of_center = p.screen_to_world(Vec2::new(900.0, 384.0), container, 0.0);
    assert!(right_of_center.x > 0.0);
}

#[test]
fn screen_world_round_trip() {
    let (p, container) = reference();
    for point in [
        Vec2::new(0.0, 0.0),
        Vec2::new(1024.0, 768.0),
        Vec2::new(123.0, 456.0),
        Vec2::new(512.0, 1.0),
    ] {
        let world = p.screen_to_world(point, container, 0.0);
        let back = p.world_to_screen(world, container, 0.0);
        assert!((back - point).length() < 1e-2, "{point} -> {back}");
    }
}

#[test]
fn each_axis_projects_independently() {
    let (p, container) = reference();
    let a = p.screen_to_world(Vec2::new(100.0, 384.0), container, 0.0);
    let b = p.screen_to_world(Vec2::new(100.0, 700.0), container, 0.0);
    assert!((a.x - b.x).abs() < EPS, "x depends on y");
}

#[test]
fn zero_extent_container_yields_zero_not_nan() {
    let (p, _) = reference();
    let degenerate = Rect::new(0.0, 0.0, 0.0, 0.0);
    let ratio = p.pixels_to_world(degenerate, Vec2::new(400.0, 400.0), 0.0);
    assert_eq!(ratio, Vec2::ZERO);
    let world = p.screen_to_world(Vec2::new(10.0, 10.0), degenerate, 0.0);
    assert_eq!(world, Vec2::ZERO);
    assert!(!ratio.x.is_nan() && !ratio.y.is_nan());
}

#[test]
fn pixel_extent_scales_linearly() {
    let (p, container) = reference();
    let one = p.pixel_width_to_world(container, 1.0, 0.0);
    let four_hundred = p.pixel_width_to_world(container, 400.0, 0.0);
    assert!((four_hundred - one * 400.0).abs() < EPS);
    // The full container width spans the full frustum width.
    let full = p.pixel_width_to_world(container, 1024.0, 0.0);
    assert!((full - p.frustum_size(0.0).x).abs() < EPS);
}

#[test]
fn element_center_is_taken_relative_to_container() {
    let (p, _) = reference();
    // A container offset from the page origin must not shift the mapping.
    let container = Rect::new(100.0, 50.0, 1024.0, 768.0);
    let element = Rect::new(100.0 + 412.0, 50.0 + 284.0, 200.0, 200.0);
    // Element center sits at the container center.
    let world = p.element_to_world(element, container, 0.0);
    assert!(world.length() < EPS);
}

#[test]
fn rect_center() {
    let rect = Rect::new(10.0, 20.0, 100.0, 40.0);
    assert_eq!(rect.center(), Vec2::new(60.0, 40.0));
}
