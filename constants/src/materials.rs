/// Default parameters of the swirl program.
pub const SWIRL_SCALE: f32 = 3.0;
pub const SWIRL_BRIGHTNESS: f32 = 2.0;
pub const SWIRL_OPACITY: f32 = 0.5;
pub const SWIRL_DEPTH: f32 = 1.0;
pub const SWIRL_DISTORTION: f32 = 25.0;
pub const SWIRL_SPEED: f32 = 1.0;

/// Explicit draw order of substituted parts. Higher draws later.
pub const GLASS_DRAW_ORDER: f32 = 1.0;
pub const SWIRL_DRAW_ORDER: f32 = 2.0;

/// Case-insensitive material name fragments that trigger substitution.
pub const GLASS_MATERIAL_TAG: &str = "glass";
pub const SWIRL_MATERIAL_TAG: &str = "swirl";

/// Optical glass used on full-fidelity devices.
pub const GLASS_ROUGHNESS: f32 = 0.2;
pub const GLASS_TRANSMISSION: f32 = 1.0;
pub const GLASS_IOR: f32 = 1.5;
pub const GLASS_THICKNESS: f32 = 1.0;

/// Strength of the background reflection on the model.
pub const GLASS_ENV_MAP_INTENSITY: f32 = 1.6;

/// Plain translucent glass used on reduced-fidelity devices.
pub const LITE_GLASS_ROUGHNESS: f32 = 0.25;
pub const LITE_GLASS_OPACITY: f32 = 0.35;

/// Linear tint applied to the unshaded background quad on reduced-fidelity devices.
pub const LITE_BACKGROUND_TINT: f32 = 0.18;

/// Seconds a background crossfade takes to complete.
pub const CROSSFADE_DURATION_SECONDS: f32 = 0.2;
