use glam::Vec3;

// Shared tuning constants for the PC monitor, used by both web and native frontends.

// Asset
pub const SCREEN_MESH_NAME: &str = "Screen";
// Fixed wide-shot camera position used to orient the screen normal toward the viewer
pub const REFERENCE_VIEWPOINT: [f32; 3] = [-1.8, 1.4, 2.6];

// Panel fitting
pub const TARGET_PIXEL_WIDTH: u32 = 1200;
pub const DEFAULT_PIXEL_HEIGHT: u32 = 675; // used until an anchor is available
pub const BEZEL_MARGIN: f32 = 0.98;
pub const UI_SCALE: f32 = 44.0;
pub const PANEL_WORLD_Z_OFFSET: f32 = 0.01; // distance off the glass in world units
pub const PANEL_LOCAL_Y_OFFSET: f32 = 0.07;
pub const COVER_Z_FRACTION: f32 = 0.3; // cover plane sits at this fraction of the panel offset

// Power
pub const POWER_ON_DELAY_MS: f64 = 450.0;
pub const SHUTTER_LAMBDA: f32 = 6.5;
pub const POWER_LAMBDA: f32 = 4.0;
pub const STREAK_LAMBDA: f32 = 8.0;
pub const COVER_LAMBDA: f32 = 10.0;
pub const STREAK_HOLD_MS: f64 = 260.0;

// Glitch gates (minimum power for an event to fire)
pub const LOW_POWER_GATE: f32 = 0.3;
pub const HIGH_POWER_GATE: f32 = 0.6;

// Glitch timings (milliseconds)
pub const LINE_DELAY_MS: (f64, f64) = (4_000.0, 12_000.0);
pub const LINE_DURATION_MS: (f64, f64) = (120.0, 340.0);
pub const TEAR_DELAY_MS: (f64, f64) = (6_000.0, 16_000.0);
pub const TEAR_DURATION_MS: (f64, f64) = (90.0, 270.0);
pub const STATIC_DELAY_MS: (f64, f64) = (45_000.0, 105_000.0);
pub const STATIC_DURATION_MS: (f64, f64) = (160.0, 380.0);
pub const DEGAUSS_DELAY_MS: (f64, f64) = (90_000.0, 180_000.0);
pub const DEGAUSS_DURATION_MS: f64 = 900.0;
pub const ROLL_DELAY_MS: (f64, f64) = (20_000.0, 40_000.0);
pub const ROLL_UP_MS: (f64, f64) = (900.0, 1_500.0);
pub const ROLL_DOWN_MS: (f64, f64) = (500.0, 1_000.0);
pub const ROLL_AMPLITUDE_PX: (f32, f32) = (12.0, 36.0);

// Static burst hues: R, Y, G, C, B, M
pub const STATIC_HUES: [f32; 6] = [0.0, 60.0, 120.0, 180.0, 240.0, 300.0];
pub const STATIC_BURST_DEFAULT_MS: f64 = 280.0;
pub const STATIC_BURST_MIN_MS: f64 = 120.0;
pub const STATIC_BURST_MAX_MS: f64 = 1_000.0;

// Effect strength multipliers
pub const STRENGTH_MIN: f32 = 0.0;
pub const STRENGTH_MAX: f32 = 2.0;

// Compositor geometry
pub const PANEL_RADIUS_PX: f32 = 21.0;
pub const PANEL_WIDTH_FRACTION: f32 = 0.93;
pub const PANEL_HEIGHT_FRACTION: f32 = 0.90;
pub const OFF_NARROW_MAX_PCT: f32 = 3.0;
pub const CURVE_RX_DEG: f32 = 0.6;
pub const CURVE_RY_DEG: f32 = -0.6;
pub const CURVE_PERSPECTIVE_PX: f32 = 1200.0;
pub const ROLL_EDGE_MASK_PX: f32 = 12.0;
pub const STREAK_VISIBLE_MIN: f32 = 0.001;
pub const STREAK_BAND_FRACTION: f32 = 0.075;

// Camera
pub const CAMERA_FOV_DEGREES: f32 = 50.0;
pub const CLOSE_SHOT_FILL: f32 = 0.8;
pub const CAMERA_LAMBDA: f32 = 5.0;
pub const WIDE_SHOT_KEY: &str = "wide";
pub const OVERVIEW_SHOT_KEY: &str = "overview";
pub const CLOSE_SHOT_KEY: &str = "pc";
pub const ROOM_LOOK_AT: [f32; 3] = [0.0, 0.8, 0.0];
pub const OVERVIEW_POSITION: [f32; 3] = [0.0, 1.5, 3.0];

#[inline]
pub fn reference_viewpoint_vec3() -> Vec3 {
    Vec3::from_array(REFERENCE_VIEWPOINT)
}
