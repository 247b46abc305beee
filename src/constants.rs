/// Grid, scroll and interaction tuning constants.
///
/// These constants express intended behavior (cell geometry, time constants,
/// clamp limits) and keep magic numbers out of the code.
// Logical cell edge length in CSS pixels
pub const CELL_SIZE_PX: f32 = 400.0;

// Extra cells kept alive on each side of the viewport
pub const POOL_BUFFER_CELLS: i64 = 2;

// Damping rates for the scroll offset (higher = faster response)
pub const SCROLL_DRAG_LAMBDA: f32 = 10.0;
pub const SCROLL_IDLE_LAMBDA: f32 = 5.0;

// Per-frame dt cap so a suspended tab cannot produce a giant jump (seconds)
pub const FRAME_DT_MAX_SEC: f32 = 0.1;

// Pointer velocity sampling window; gaps outside it are skipped (ms)
pub const VELOCITY_SAMPLE_MAX_MS: f64 = 100.0;

// Velocity is normalized to a 16 ms frame and clamped symmetrically
pub const VELOCITY_FRAME_MS: f32 = 16.0;
pub const VELOCITY_MAX: f32 = 50.0;

// A click that follows more pointer travel than this is a drag, not a click
pub const CLICK_DRAG_SUPPRESS_PX: f32 = 5.0;

// Camera parameters; every synchronized instance lives on the z = 0 plane
pub const CAMERA_FOV_DEG: f32 = 50.0;
pub const CAMERA_Z: f32 = 5.0;
pub const GRID_PLANE_Z: f32 = 0.0;

// Border frame drawn around each cell
pub const BORDER_WIDTH_PX: f32 = 0.75;
pub const BORDER_COLOR: [f32; 3] = [0.73, 0.73, 0.73];

// Fade lifecycle around focus transitions (seconds)
pub const FADE_OUT_SEC: f32 = 0.5;
pub const FADE_IN_SEC: f32 = 0.5;
pub const FADE_IN_DELAY_SEC: f32 = 0.5;

// Full-viewport focus overlay transition (seconds)
pub const FOCUS_TRANSITION_SEC: f32 = 0.8;

// Ornament hover spin (radians per frame step) and damped return rate
pub const ORNAMENT_SPIN_SPEED: f32 = 0.02;
pub const ORNAMENT_RETURN_LAMBDA: f32 = 8.0;

// Ornament sprite edge as a fraction of the cell edge
pub const ORNAMENT_CELL_FRACTION: f32 = 0.35;

// Barrel distortion post stage: damped between idle and drag targets
pub const DISTORTION_LAMBDA: f32 = 8.0;
pub const DISTORTION_IDLE: f32 = 0.4;
pub const DISTORTION_DRAG: f32 = 1.6;
pub const ABERRATION_IDLE: f32 = 0.02;
pub const ABERRATION_DRAG: f32 = 0.06;

// Extra distortion contributed by scroll speed (normalized)
pub const DISTORTION_SPEED_BOOST: f32 = 0.15;

// Label atlas backing canvas edge (pixels)
pub const LABEL_ATLAS_SIZE: u32 = 1024;
