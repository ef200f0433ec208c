//! Custom GPU programs and the material variants chosen by fidelity tier.
//!
//! Each program is a Bevy `Material` whose uniform block mirrors the WGSL
//! struct of the same name. The vertex stage is Bevy's standard mesh stage,
//! which already hands world position and UV to the fragment stage.

/// Background compositing program: two-texture blend under a noise mask.
pub mod backdrop;

/// Glass substitutes for parts tagged as glass.
pub mod glass;

/// Swirl programs in their full and reduced variants.
pub mod swirl;

use bevy::prelude::*;

use crate::engine::materials::backdrop::BackdropMaterial;
use crate::engine::materials::swirl::{SwirlLiteMaterial, SwirlMaterial};

/// WGSL module imported by both the swirl and background programs.
pub const NOISE_SHADER_PATH: &str = "shaders/noise.wgsl";

/// Keeps the shared shader library loaded so `#import backdrop::noise` resolves.
#[derive(Resource)]
pub struct ShaderLibrary {
    #[allow(dead_code)]
    noise: Handle<Shader>,
}

pub struct BackdropMaterialsPlugin;

impl Plugin for BackdropMaterialsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            MaterialPlugin::<SwirlMaterial>::default(),
            MaterialPlugin::<SwirlLiteMaterial>::default(),
            MaterialPlugin::<BackdropMaterial>::default(),
        ))
        .add_systems(Startup, load_shader_library);
    }
}

fn load_shader_library(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(ShaderLibrary {
        noise: asset_server.load(NOISE_SHADER_PATH),
    });
}
