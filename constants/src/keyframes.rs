/// Target zoom, vertical offset and base rotation for the model at one point of the scroll range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelKeyframe {
    /// Multiplier on the normalised base scale. Always positive.
    pub zoom: f32,
    /// Vertical shift in units of the model's normalised half height.
    pub y_shift: f32,
    /// Base pitch in radians.
    pub rot_x: f32,
    /// Base yaw in radians.
    pub rot_y: f32,
}

impl ModelKeyframe {
    pub const fn new(zoom: f32, y_shift: f32, rot_x: f32, rot_y: f32) -> Self {
        Self {
            zoom,
            y_shift,
            rot_x,
            rot_y,
        }
    }
}

/// Ordered keyframes spread evenly over the normalised scroll range `[0, 1]`.
pub const MODEL_KEYFRAMES: [ModelKeyframe; 5] = [
    ModelKeyframe::new(1.0, 0.0, 0.0, 0.0),
    ModelKeyframe::new(4.0, 2.5, 0.0, 1.0),
    ModelKeyframe::new(7.0, 2.0, 0.0, 0.0),
    ModelKeyframe::new(5.2, 1.5, -1.15, -3.0),
    ModelKeyframe::new(1.0, 0.0, 0.0, -3.0),
];

/// Exponential smoothing factor applied per frame to the scroll progress.
pub const SCROLL_SMOOTHING: f32 = 0.12;

/// Exponential smoothing factor applied per frame to the model rotation.
pub const ROTATION_SMOOTHING: f32 = 0.08;

/// Weight of the pointer-driven orientation on top of the keyframe rotation.
pub const POINTER_ROTATION_STRENGTH: f32 = 0.4;
