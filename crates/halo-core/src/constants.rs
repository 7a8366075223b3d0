use glam::Vec3;

// Shared scene/camera tuning constants used by both web and native frontends.

// Arrangement defaults
pub const RING_COUNT: usize = 20;
pub const RING_RADIUS_X: f32 = 9.0;
pub const RING_RADIUS_Y: f32 = 9.0;
pub const GRID_SIDE: usize = 4;
pub const GRID_STEP: f32 = 0.4;
pub const CURVE_COUNT: usize = 40;
pub const CURVE_RADIUS: f32 = 0.5; // x spacing between consecutive curve instances
pub const CURVE_OFFSET: f32 = 3.0; // curve amplitude on y

// Camera
pub const CAMERA_FOV_DEG: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_DISTANCE: f32 = 45.0; // eye starts on +Z at this distance
pub const ORBIT_DAMPING: f32 = 0.05; // fraction of remaining angle covered per tick
pub const ORBIT_MIN_DISTANCE: f32 = 2.0;
pub const ORBIT_MAX_DISTANCE: f32 = 90.0;
pub const ORBIT_ZOOM_STEP: f32 = 0.95; // distance multiplier per wheel notch
pub const ORBIT_ELEVATION_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

// Viewport
pub const MAX_PIXEL_SCALE: f32 = 2.0;

// Display
// #01062D
pub const CLEAR_COLOR: [f32; 4] = [
    0x01 as f32 / 255.0,
    0x06 as f32 / 255.0,
    0x2D as f32 / 255.0,
    1.0,
];
pub const AXES_SIZE: f32 = 5.0;
pub const SPHERE_RADIUS: f32 = 1.0;
pub const SPHERE_SEGMENTS: u32 = 64;

// Light used for the shadow-frustum helper
pub const LIGHT_POSITION: [f32; 3] = [10.0, 12.0, 8.0];
pub const SHADOW_HALF_EXTENT: f32 = 12.0;
pub const SHADOW_NEAR: f32 = 0.5;
pub const SHADOW_FAR: f32 = 40.0;

// Direct-mode defaults
pub const ORBIT_SPEED: f32 = 4.0; // radians per second added to every instance's base angle
pub const WAVE_SPEED: f32 = 2.0;
pub const SPIN_STEP_PER_TICK: f32 = 0.02; // radians; frame-rate dependent
pub const SPIN_RATE_PER_SEC: f32 = 1.2;

// Scheduled-mode ticker
pub const TICKER_HZ: u32 = 60;

#[inline]
pub fn light_position_vec3() -> Vec3 {
    Vec3::from(LIGHT_POSITION)
}
