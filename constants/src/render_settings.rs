use bevy::math::Vec3;

/// Largest render area in physical pixels; bigger viewports are downscaled uniformly.
pub const MAX_RENDER_PIXELS: f32 = 1000.0 * 1000.0;

/// Vertical field of view of the scene camera, in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 5.0);

/// Side length of the square background quad.
pub const BACKGROUND_QUAD_SIZE: f32 = 10.0;

/// Depth at which the background quad sits behind the model.
pub const BACKGROUND_QUAD_DEPTH: f32 = -3.0;

/// Largest axis of a freshly loaded model after normalisation.
pub const MODEL_TARGET_SIZE: f32 = 2.0;

/// Canvas selector the engine renders into on the web.
pub const CANVAS_SELECTOR: &str = "#backdrop";

/// Cube face edge, in texels, of the reflection map built from the background.
pub const ENVIRONMENT_FACE_SIZE: u32 = 64;

/// Cube face edge used on reduced-fidelity devices.
pub const LITE_ENVIRONMENT_FACE_SIZE: u32 = 32;
