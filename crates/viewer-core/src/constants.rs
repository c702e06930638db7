use glam::Vec3;

// Shared scene layout and editing constants used by the web and native frontends.

// Scene layout
pub const BASE_SIZE: f32 = 100.0; // edge length of the reference box and grid
pub const GRID_DIVISIONS: u32 = 10;
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = BASE_SIZE * 20.0;
pub const CAMERA_FOVY_DEGREES: f32 = 50.0;

// Lighting
pub const AMBIENT_INTENSITY: f32 = 0.2;
pub const POINT_LIGHTS: [([f32; 3], f32); 2] = [
    ([BASE_SIZE, BASE_SIZE, 0.0], 1.0),
    ([-BASE_SIZE, BASE_SIZE, 50.0], 0.8),
];

// Markers
pub const MARKER_RADIUS: f32 = BASE_SIZE / 40.0;
pub const MARKER_COLOR: [f32; 3] = [1.0, 0.388, 0.322]; // #ff6352
pub const ACTIVE_MARKER_COLOR: [f32; 3] = [0.0, 0.122, 0.82]; // #001fd1
pub const BACKGROUND_COLOR: [f32; 3] = [0.867, 0.867, 0.867]; // #ddd
pub const MODEL_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

// Editing
pub const EDIT_DEBOUNCE_MS: u64 = 500; // quiet period before a staged edit commits
pub const MARKER_ID_LEN: usize = 21;

/// Inclusive slider range and step for one transform field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Clamp a value into the range. The store never clamps; only widgets do.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

pub const SCALE_RANGE: SliderRange = SliderRange::new(0.1, 50.0, 0.1);
pub const POSITION_RANGE: SliderRange = SliderRange::new(-100.0, 100.0, 0.1);
pub const ROTATION_RANGE: SliderRange = SliderRange::new(-1.0, 1.0, 0.01); // turns

#[inline]
pub fn camera_start_position() -> Vec3 {
    Vec3::new(0.0, BASE_SIZE, BASE_SIZE)
}
