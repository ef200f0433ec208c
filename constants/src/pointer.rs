/// Pointer speed (logical pixels per second) at which the light signal saturates.
pub const SPEED_CEILING: f32 = 1000.0;

/// Light intensity produced by a motionless pointer.
pub const MIN_LIGHT_INTENSITY: f32 = 0.4;

/// Light intensity produced at or above the speed ceiling.
pub const MAX_LIGHT_INTENSITY: f32 = 2.5;

/// Largest orientation offset on either axis, 60 degrees.
pub const MAX_POINTER_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

/// Floor applied to the time between two pointer samples, in seconds.
pub const MIN_SAMPLE_INTERVAL: f64 = 0.001;
