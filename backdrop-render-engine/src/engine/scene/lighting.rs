use bevy::prelude::*;
use constants::lighting::{
    AMBIENT_BRIGHTNESS_PER_UNIT, COLOUR_SMOOTHING, DIRECTIONAL_LIGHT_POSITION,
    DIRECTIONAL_LUX_PER_UNIT, FAST_LIGHT_COLOUR, INITIAL_AMBIENT_INTENSITY,
    INITIAL_DIRECTIONAL_INTENSITY, INTENSITY_SMOOTHING, SLOW_LIGHT_COLOUR, hex_channels,
};

use crate::engine::animation::frame::FrameSignals;
use crate::engine::core::lifecycle::SceneEntity;
use crate::engine::input::pointer::PointerSignal;

#[derive(Component)]
pub struct SceneLight;

fn hex_colour(hex: u32) -> LinearRgba {
    let [r, g, b] = hex_channels(hex);
    Color::srgb_u8(r, g, b).to_linear()
}

/// Smoothed light intensities (in signal units) and shared colour.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct LightingState {
    pub ambient: f32,
    pub directional: f32,
    pub colour: LinearRgba,
}

impl Default for LightingState {
    fn default() -> Self {
        Self {
            ambient: INITIAL_AMBIENT_INTENSITY,
            directional: INITIAL_DIRECTIONAL_INTENSITY,
            colour: LinearRgba::WHITE,
        }
    }
}

impl LightingState {
    /// Chase the pointer's light signal by one tick.
    pub fn step(&mut self, signal: &PointerSignal) {
        let target = signal.light_intensity;
        self.ambient += (target - self.ambient) * INTENSITY_SMOOTHING;
        self.directional += (target - self.directional) * INTENSITY_SMOOTHING;

        let speed = signal.light_speed.clamp(0.0, 1.0);
        let target_colour = hex_colour(SLOW_LIGHT_COLOUR).mix(&hex_colour(FAST_LIGHT_COLOUR), speed);
        self.colour = self.colour.mix(&target_colour, COLOUR_SMOOTHING);
    }

    pub fn ambient_brightness(&self) -> f32 {
        self.ambient * AMBIENT_BRIGHTNESS_PER_UNIT
    }

    pub fn directional_illuminance(&self) -> f32 {
        self.directional * DIRECTIONAL_LUX_PER_UNIT
    }
}

pub fn spawn_lights(mut commands: Commands) {
    let state = LightingState::default();

    commands.insert_resource(AmbientLight {
        color: state.colour.into(),
        brightness: state.ambient_brightness(),
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            color: state.colour.into(),
            illuminance: state.directional_illuminance(),
            ..default()
        },
        Transform::from_translation(DIRECTIONAL_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        SceneLight,
        SceneEntity,
        Name::new("Key Light"),
    ));

    commands.insert_resource(state);
}

pub fn update_lighting(
    signals: Res<FrameSignals>,
    mut state: ResMut<LightingState>,
    mut ambient: ResMut<AmbientLight>,
    mut lights: Query<&mut DirectionalLight, With<SceneLight>>,
) {
    state.step(&signals.pointer);

    ambient.color = state.colour.into();
    ambient.brightness = state.ambient_brightness();

    for mut light in &mut lights {
        light.color = state.colour.into();
        light.illuminance = state.directional_illuminance();
    }
}
