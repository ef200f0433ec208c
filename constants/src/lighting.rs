use bevy::math::Vec3;

/// Ambient light intensity before the first pointer sample arrives.
pub const INITIAL_AMBIENT_INTENSITY: f32 = 0.7;

/// Directional light intensity before the first pointer sample arrives.
pub const INITIAL_DIRECTIONAL_INTENSITY: f32 = 1.0;

/// Placement of the directional light; it always aims at the origin.
pub const DIRECTIONAL_LIGHT_POSITION: Vec3 = Vec3::new(5.0, 10.0, 7.5);

/// Light colour while the pointer is at rest (sRGB hex).
pub const SLOW_LIGHT_COLOUR: u32 = 0x8fd9ff;

/// Light colour at or above the speed ceiling (sRGB hex).
pub const FAST_LIGHT_COLOUR: u32 = 0xffffff;

/// Per-frame smoothing factor of both light intensities.
pub const INTENSITY_SMOOTHING: f32 = 0.1;

/// Per-frame smoothing factor of the light colour.
pub const COLOUR_SMOOTHING: f32 = 0.15;

/// Ambient brightness (cd/m²) produced by one unit of signal intensity.
pub const AMBIENT_BRIGHTNESS_PER_UNIT: f32 = 400.0;

/// Directional illuminance (lux) produced by one unit of signal intensity.
pub const DIRECTIONAL_LUX_PER_UNIT: f32 = 4000.0;

/// Split a `0xRRGGBB` value into its three channel bytes.
pub const fn hex_channels(hex: u32) -> [u8; 3] {
    [
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
    ]
}

/// Environment luminance (cd/m²) of a fully white background texel.
pub const ENVIRONMENT_BRIGHTNESS_PER_UNIT: f32 = 400.0;
