use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::render::render_resource::{AsBindGroup, ShaderRef, ShaderType};
use constants::materials::LITE_BACKGROUND_TINT;

const BACKDROP_SHADER_PATH: &str = "shaders/backdrop.wgsl";

/// Blend parameters of the background program.
#[derive(Debug, Clone, Copy, PartialEq, Default, ShaderType)]
pub struct BackdropUniforms {
    /// Crossfade progress in `[0, 1]`: 0 shows `current`, 1 shows `next`.
    pub mix: f32,
    pub time: f32,
    pub _padding: Vec2,
}

/// Full-tier background: two textures blended by `mix`, shaped by a noise cloud mask.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct BackdropMaterial {
    #[texture(0)]
    #[sampler(1)]
    pub current: Handle<Image>,
    #[texture(2)]
    #[sampler(3)]
    pub next: Handle<Image>,
    #[uniform(4)]
    pub uniforms: BackdropUniforms,
}

impl BackdropMaterial {
    /// Both slots start on the same texture with no fade in progress.
    pub fn showing(texture: Handle<Image>) -> Self {
        Self {
            current: texture.clone(),
            next: texture,
            uniforms: BackdropUniforms::default(),
        }
    }
}

impl Material for BackdropMaterial {
    fn fragment_shader() -> ShaderRef {
        BACKDROP_SHADER_PATH.into()
    }
}

/// Reduced-tier background: the image drawn unshaded and darkened by a fixed tint.
pub fn lite_background_material(texture: Handle<Image>) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::linear_rgb(
            LITE_BACKGROUND_TINT,
            LITE_BACKGROUND_TINT,
            LITE_BACKGROUND_TINT,
        ),
        base_color_texture: Some(texture),
        unlit: true,
        ..default()
    }
}
