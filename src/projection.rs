// Screen ↔ world projection onto a fixed-depth plane.
//
// Single source of truth for every screen→3-D placement in the crate: the
// synchronizer and the renderer both go through [`Projector`], nothing else
// duplicates this math.

use glam::Vec2;

/// Pixel-space rectangle (container bounds or an element's client rect).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }
}

/// Perspective camera parameters for projecting onto a world plane.
///
/// Rebuilt from live camera state whenever it is used; frustum dimensions
/// are never cached across frames.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    /// Camera eye z; the camera looks down -z at the origin.
    pub camera_z: f32,
}

impl Projector {
    pub fn new(fov_y_deg: f32, aspect: f32, camera_z: f32) -> Self {
        Self {
            fov_y: fov_y_deg.to_radians(),
            aspect,
            camera_z,
        }
    }

    /// World-space width/height visible at `plane_z`.
    pub fn frustum_size(&self, plane_z: f32) -> Vec2 {
        let distance = (self.camera_z - plane_z).abs();
        let height = 2.0 * (self.fov_y * 0.5).tan() * distance;
        Vec2::new(height * self.aspect, height)
    }

    /// Convert a pixel extent inside `container` to world units at `plane_z`.
    ///
    /// A zero container extent yields 0.0 on that axis rather than NaN.
    pub fn pixels_to_world(&self, container: Rect, px: Vec2, plane_z: f32) -> Vec2 {
        Vec2::new(
            self.pixel_width_to_world(container, px.x, plane_z),
            self.pixel_height_to_world(container, px.y, plane_z),
        )
    }

    pub fn pixel_width_to_world(&self, container: Rect, px: f32, plane_z: f32) -> f32 {
        if container.width <= 0.0 {
            return 0.0;
        }
        px * self.frustum_size(plane_z).x / container.width
    }

    pub fn pixel_height_to_world(&self, container: Rect, px: f32, plane_z: f32) -> f32 {
        if container.height <= 0.0 {
            return 0.0;
        }
        px * self.frustum_size(plane_z).y / container.height
    }

    /// Project a screen point (pixels relative to `container`) onto the
    /// plane at `plane_z`. Y is inverted: screen-down maps to world-down.
    pub fn screen_to_world(&self, screen: Vec2, container: Rect, plane_z: f32) -> Vec2 {
        if container.width <= 0.0 || container.height <= 0.0 {
            return Vec2::ZERO;
        }
        let ndc_x = (screen.x / container.width) * 2.0 - 1.0;
        let ndc_y = -((screen.y / container.height) * 2.0 - 1.0);
        let frustum = self.frustum_size(plane_z);
        Vec2::new(ndc_x * frustum.x * 0.5, ndc_y * frustum.y * 0.5)
    }

    /// Inverse of [`screen_to_world`](Self::screen_to_world).
    pub fn world_to_screen(&self, world: Vec2, container: Rect, plane_z: f32) -> Vec2 {
        let frustum = self.frustum_size(plane_z);
        if frustum.x <= 0.0 || frustum.y <= 0.0 {
            return Vec2::ZERO;
        }
        let ndc_x = world.x / (frustum.x * 0.5);
        let ndc_y = world.y / (frustum.y * 0.5);
        Vec2::new(
            (ndc_x + 1.0) * 0.5 * container.width,
            (-ndc_y + 1.0) * 0.5 * container.height,
        )
    }

    /// World position of an element's center, with the element's client rect
    /// taken relative to `container`.
    pub fn element_to_world(&self, element: Rect, container: Rect, plane_z: f32) -> Vec2 {
        let center = Vec2::new(
            element.left + element.width * 0.5 - container.left,
            element.top + element.height * 0.5 - container.top,
        );
        self.screen_to_world(center, container, plane_z)
    }
}
