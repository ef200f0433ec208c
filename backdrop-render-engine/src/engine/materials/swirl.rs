use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::render::mesh::MeshVertexBufferLayoutRef;
use bevy::render::render_resource::{
    AsBindGroup, CompareFunction, RenderPipelineDescriptor, ShaderRef, ShaderType,
    SpecializedMeshPipelineError,
};
use constants::materials::{
    SWIRL_BRIGHTNESS, SWIRL_DEPTH, SWIRL_DISTORTION, SWIRL_DRAW_ORDER, SWIRL_OPACITY, SWIRL_SCALE,
    SWIRL_SPEED,
};
use constants::render_settings::CAMERA_POSITION;

use crate::engine::animation::frame::FrameSignals;
use crate::engine::core::capability::FidelityTier;

const SWIRL_SHADER_PATH: &str = "shaders/swirl.wgsl";
const SWIRL_LITE_SHADER_PATH: &str = "shaders/swirl_lite.wgsl";

/// Uniform block of the full swirl program. Field order matches `SwirlUniforms` in WGSL.
#[derive(Debug, Clone, Copy, PartialEq, ShaderType)]
pub struct SwirlUniforms {
    pub time: f32,
    pub scale: f32,
    pub brightness: f32,
    pub opacity: f32,
    /// Distance along the view ray spanned by the three depth samples.
    pub depth: f32,
    /// Strength of the noise perturbation of the swirl phase.
    pub distortion: f32,
    pub speed: f32,
    pub camera_position: Vec3,
}

impl Default for SwirlUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            scale: SWIRL_SCALE,
            brightness: SWIRL_BRIGHTNESS,
            opacity: SWIRL_OPACITY,
            depth: SWIRL_DEPTH,
            distortion: SWIRL_DISTORTION,
            speed: SWIRL_SPEED,
            camera_position: CAMERA_POSITION,
        }
    }
}

/// Uniform block of the reduced swirl program.
#[derive(Debug, Clone, Copy, PartialEq, ShaderType)]
pub struct SwirlLiteUniforms {
    pub time: f32,
    pub scale: f32,
    pub brightness: f32,
    pub opacity: f32,
    pub camera_position: Vec3,
}

impl Default for SwirlLiteUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            scale: SWIRL_SCALE,
            brightness: SWIRL_BRIGHTNESS,
            opacity: SWIRL_OPACITY,
            camera_position: CAMERA_POSITION,
        }
    }
}

/// Swirl surface that fakes volumetric depth with three weighted samples along the view ray.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone, Default)]
pub struct SwirlMaterial {
    #[uniform(0)]
    pub uniforms: SwirlUniforms,
}

/// Single-sample ring swirl without per-pixel noise.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone, Default)]
pub struct SwirlLiteMaterial {
    #[uniform(0)]
    pub uniforms: SwirlLiteUniforms,
}

/// Per-frame parameters shared by both swirl variants.
pub trait SwirlProgram: Material {
    fn advance(&mut self, time: f32, camera_position: Vec3);
}

impl SwirlProgram for SwirlMaterial {
    fn advance(&mut self, time: f32, camera_position: Vec3) {
        self.uniforms.time = time;
        self.uniforms.camera_position = camera_position;
    }
}

impl SwirlProgram for SwirlLiteMaterial {
    fn advance(&mut self, time: f32, camera_position: Vec3) {
        self.uniforms.time = time;
        self.uniforms.camera_position = camera_position;
    }
}

/// Swirl parts blend over everything drawn before them and ignore existing depth,
/// so overlapping swirl faces never cull each other.
fn disable_depth_test(descriptor: &mut RenderPipelineDescriptor) {
    if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
        depth_stencil.depth_compare = CompareFunction::Always;
    }
}

impl Material for SwirlMaterial {
    fn fragment_shader() -> ShaderRef {
        SWIRL_SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn depth_bias(&self) -> f32 {
        SWIRL_DRAW_ORDER
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        disable_depth_test(descriptor);
        Ok(())
    }
}

impl Material for SwirlLiteMaterial {
    fn fragment_shader() -> ShaderRef {
        SWIRL_LITE_SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn depth_bias(&self) -> f32 {
        SWIRL_DRAW_ORDER
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        disable_depth_test(descriptor);
        Ok(())
    }
}

/// The swirl variant in use, created once per loaded model.
#[derive(Debug, Clone)]
pub enum SwirlHandle {
    Full(Handle<SwirlMaterial>),
    Lite(Handle<SwirlLiteMaterial>),
}

impl SwirlHandle {
    pub fn create(
        tier: FidelityTier,
        full: &mut Assets<SwirlMaterial>,
        lite: &mut Assets<SwirlLiteMaterial>,
    ) -> Self {
        match tier {
            FidelityTier::Full => SwirlHandle::Full(full.add(SwirlMaterial::default())),
            FidelityTier::Reduced => SwirlHandle::Lite(lite.add(SwirlLiteMaterial::default())),
        }
    }
}

/// Push the tick's time and camera position into every swirl of type `M`.
pub fn update_swirl_uniforms<M: SwirlProgram>(
    signals: Res<FrameSignals>,
    mut materials: ResMut<Assets<M>>,
) {
    for (_, material) in materials.iter_mut() {
        material.advance(signals.elapsed, signals.camera_position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWIRL_SOURCE: &str = include_str!("../../../assets/shaders/swirl.wgsl");
    const SWIRL_LITE_SOURCE: &str = include_str!("../../../assets/shaders/swirl_lite.wgsl");
    const HUE_EASING: &str = "rgb = rgb * rgb * (3.0 - 2.0 * rgb);";

    /// Body of the WGSL function `name`, up to its closing brace.
    fn wgsl_function<'a>(source: &'a str, name: &str) -> &'a str {
        let start = source
            .find(&format!("fn {name}("))
            .unwrap_or_else(|| panic!("no fn {name}"));
        let body = &source[start..];
        &body[..body.find("\n}").map_or(body.len(), |end| end + 2)]
    }

    #[test]
    fn full_swirl_hue_eases_then_desaturates_toward_grey() {
        let hsb = wgsl_function(SWIRL_SOURCE, "hsb_to_rgb");
        assert!(hsb.contains(HUE_EASING));
        assert!(hsb.contains("return c.z * mix(vec3<f32>(0.5), rgb, c.y);"));
        assert!(!hsb.contains("rgb * rgb, c.y"));
    }

    #[test]
    fn lite_swirl_hue_eases_then_desaturates_toward_white() {
        let hsb = wgsl_function(SWIRL_LITE_SOURCE, "hsb_to_rgb");
        assert!(hsb.contains(HUE_EASING));
        assert!(hsb.contains("return c.z * mix(vec3<f32>(1.0), rgb, c.y);"));
    }

    #[test]
    fn tier_selects_matching_swirl_variant() {
        let mut full = Assets::<SwirlMaterial>::default();
        let mut lite = Assets::<SwirlLiteMaterial>::default();

        let chosen = SwirlHandle::create(FidelityTier::Full, &mut full, &mut lite);
        assert!(matches!(chosen, SwirlHandle::Full(_)));
        assert_eq!(full.len(), 1);
        assert_eq!(lite.len(), 0);

        let chosen = SwirlHandle::create(FidelityTier::Reduced, &mut full, &mut lite);
        assert!(matches!(chosen, SwirlHandle::Lite(_)));
        assert_eq!(lite.len(), 1);
    }

    #[test]
    fn advance_only_touches_time_and_camera() {
        let mut material = SwirlMaterial::default();
        material.advance(12.5, Vec3::new(0.0, 1.0, 5.0));
        assert_eq!(material.uniforms.time, 12.5);
        assert_eq!(material.uniforms.camera_position, Vec3::new(0.0, 1.0, 5.0));
        assert_eq!(material.uniforms.distortion, SWIRL_DISTORTION);
        assert_eq!(material.uniforms.opacity, SWIRL_OPACITY);
    }
}
