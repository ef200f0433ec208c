use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
};
use constants::lighting::ENVIRONMENT_BRIGHTNESS_PER_UNIT;
use constants::materials::GLASS_ENV_MAP_INTENSITY;
use constants::render_settings::{ENVIRONMENT_FACE_SIZE, LITE_ENVIRONMENT_FACE_SIZE};

use crate::engine::core::capability::FidelityTier;
use crate::engine::scene::camera::BackdropCamera;

const CUBE_FACES: u32 = 6;

/// Reflection source for the model: the background image currently on show,
/// wrapped around the scene as an equirectangular panorama.
#[derive(Resource, Debug, Default)]
pub struct EnvironmentReflection {
    pending: Option<Handle<Image>>,
    cubemaps: HashMap<AssetId<Image>, Handle<Image>>,
}

impl EnvironmentReflection {
    /// Reflect `texture` from the next tick on.
    pub fn show(&mut self, texture: Handle<Image>) {
        self.pending = Some(texture);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cubemap_count(&self) -> usize {
        self.cubemaps.len()
    }

    pub fn release(&mut self) {
        self.pending = None;
        self.cubemaps.clear();
    }
}

pub fn environment_face_size(tier: FidelityTier) -> u32 {
    if tier.is_reduced() {
        LITE_ENVIRONMENT_FACE_SIZE
    } else {
        ENVIRONMENT_FACE_SIZE
    }
}

/// Texel centre mapped to `[-1, 1]`.
fn texel_coordinate(index: u32, size: u32) -> f32 {
    (index as f32 + 0.5) / size as f32 * 2.0 - 1.0
}

/// View direction through a cube face texel, faces ordered +X, -X, +Y, -Y, +Z, -Z.
fn face_direction(face: u32, u: f32, v: f32) -> Vec3 {
    let direction = match face {
        0 => Vec3::new(1.0, -v, -u),
        1 => Vec3::new(-1.0, -v, u),
        2 => Vec3::new(u, 1.0, v),
        3 => Vec3::new(u, -1.0, -v),
        4 => Vec3::new(u, -v, 1.0),
        _ => Vec3::new(-u, -v, -1.0),
    };
    direction.normalize()
}

/// Panorama coordinates of a direction; `v = 0` is the top row.
fn equirect_uv(direction: Vec3) -> Vec2 {
    Vec2::new(
        0.5 + direction.z.atan2(direction.x) / TAU,
        0.5 - direction.y.clamp(-1.0, 1.0).asin() / PI,
    )
}

/// sRGB texels of the six faces, face after face. `None` when the source has
/// no pixels or a format that cannot be read back.
pub fn cubemap_texels(source: &Image, face_size: u32) -> Option<Vec<u8>> {
    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 || face_size == 0 {
        return None;
    }

    let mut texels = Vec::with_capacity((face_size * face_size * CUBE_FACES * 4) as usize);
    for face in 0..CUBE_FACES {
        for y in 0..face_size {
            for x in 0..face_size {
                let direction = face_direction(
                    face,
                    texel_coordinate(x, face_size),
                    texel_coordinate(y, face_size),
                );
                let uv = equirect_uv(direction);
                let px = ((uv.x * width as f32) as u32).min(width - 1);
                let py = ((uv.y * height as f32) as u32).min(height - 1);
                let colour = source.get_color_at(px, py).ok()?;
                texels.extend_from_slice(&colour.to_srgba().to_u8_array());
            }
        }
    }
    Some(texels)
}

/// Build a cube texture from an equirectangular image.
pub fn equirect_to_cubemap(source: &Image, face_size: u32) -> Option<Image> {
    let texels = cubemap_texels(source, face_size)?;
    let mut cubemap = Image::new(
        Extent3d {
            width: face_size,
            height: face_size,
            depth_or_array_layers: CUBE_FACES,
        },
        TextureDimension::D2,
        texels,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    cubemap.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
    Some(cubemap)
}

/// Point the camera's environment light at the pending background. Cube maps
/// are built once per image and reused when a background returns.
pub fn update_environment_map(
    mut commands: Commands,
    mut reflection: ResMut<EnvironmentReflection>,
    mut images: ResMut<Assets<Image>>,
    tier: Res<FidelityTier>,
    cameras: Query<Entity, With<BackdropCamera>>,
) {
    let Some(texture) = reflection.pending.clone() else {
        return;
    };

    let cubemap = match reflection.cubemaps.get(&texture.id()) {
        Some(cubemap) => cubemap.clone(),
        None => {
            // Not in the image store yet: retry next tick.
            let Some(source) = images.get(&texture) else {
                return;
            };
            let Some(cubemap) = equirect_to_cubemap(source, environment_face_size(*tier)) else {
                warn!("Background image cannot be read back, keeping previous reflection");
                reflection.pending = None;
                return;
            };
            let handle = images.add(cubemap);
            reflection.cubemaps.insert(texture.id(), handle.clone());
            handle
        }
    };
    reflection.pending = None;

    for camera in &cameras {
        commands.entity(camera).insert(EnvironmentMapLight {
            diffuse_map: cubemap.clone(),
            specular_map: cubemap.clone(),
            intensity: ENVIRONMENT_BRIGHTNESS_PER_UNIT * GLASS_ENV_MAP_INTENSITY,
            rotation: Quat::IDENTITY,
            affects_lightmapped_mesh_diffuse: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    /// Panorama whose upper half is red and lower half blue.
    fn sky_and_ground() -> Image {
        let mut data = Vec::new();
        for _ in 0..4 {
            data.extend_from_slice(&RED);
        }
        for _ in 0..4 {
            data.extend_from_slice(&BLUE);
        }
        Image::new(
            Extent3d {
                width: 4,
                height: 2,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            data,
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        )
    }

    fn face_texel(texels: &[u8], face_size: u32, face: u32, x: u32, y: u32) -> [u8; 4] {
        let start = (((face * face_size + y) * face_size + x) * 4) as usize;
        [
            texels[start],
            texels[start + 1],
            texels[start + 2],
            texels[start + 3],
        ]
    }

    #[test]
    fn panorama_wraps_onto_cube_faces() {
        let texels = cubemap_texels(&sky_and_ground(), 2).expect("readable source");
        assert_eq!(texels.len(), 2 * 2 * 6 * 4);

        // +Y looks at the sky, -Y at the ground.
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(face_texel(&texels, 2, 2, x, y), RED);
            assert_eq!(face_texel(&texels, 2, 3, x, y), BLUE);
        }
        // Side faces see the horizon split: upper texels sky, lower ground.
        assert_eq!(face_texel(&texels, 2, 0, 0, 0), RED);
        assert_eq!(face_texel(&texels, 2, 0, 0, 1), BLUE);
    }

    #[test]
    fn cubemap_is_a_six_layer_cube_view() {
        let cubemap = equirect_to_cubemap(&sky_and_ground(), 4).expect("cubemap");
        assert_eq!(cubemap.texture_descriptor.size.depth_or_array_layers, 6);
        assert_eq!(
            cubemap
                .texture_view_descriptor
                .as_ref()
                .and_then(|view| view.dimension),
            Some(TextureViewDimension::Cube)
        );
    }

    #[test]
    fn face_size_follows_tier() {
        assert_eq!(environment_face_size(FidelityTier::Full), ENVIRONMENT_FACE_SIZE);
        assert_eq!(
            environment_face_size(FidelityTier::Reduced),
            LITE_ENVIRONMENT_FACE_SIZE
        );
    }

    #[test]
    fn camera_reflects_current_background() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(FidelityTier::Full)
            .init_resource::<Assets<Image>>()
            .init_resource::<EnvironmentReflection>()
            .add_systems(Update, update_environment_map);

        let camera = app.world_mut().spawn(BackdropCamera).id();
        let background = app
            .world_mut()
            .resource_mut::<Assets<Image>>()
            .add(sky_and_ground());

        app.world_mut()
            .resource_mut::<EnvironmentReflection>()
            .show(background.clone());
        app.update();

        let light = app
            .world()
            .get::<EnvironmentMapLight>(camera)
            .expect("environment light on camera");
        assert_eq!(light.diffuse_map, light.specular_map);
        assert!(
            (light.intensity - ENVIRONMENT_BRIGHTNESS_PER_UNIT * GLASS_ENV_MAP_INTENSITY).abs()
                < 1e-3
        );
        let first_cubemap = light.specular_map.clone();
        assert!(!app.world().resource::<EnvironmentReflection>().is_pending());

        // Showing the same background again reuses its cube map.
        app.world_mut()
            .resource_mut::<EnvironmentReflection>()
            .show(background);
        app.update();

        assert_eq!(
            app.world().resource::<EnvironmentReflection>().cubemap_count(),
            1
        );
        assert_eq!(app.world().resource::<Assets<Image>>().len(), 2);
        assert_eq!(
            app.world()
                .get::<EnvironmentMapLight>(camera)
                .map(|light| light.specular_map.clone()),
            Some(first_cubemap)
        );
    }

    #[test]
    fn unloaded_background_stays_pending() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(FidelityTier::Reduced)
            .init_resource::<Assets<Image>>()
            .init_resource::<EnvironmentReflection>()
            .add_systems(Update, update_environment_map);
        let camera = app.world_mut().spawn(BackdropCamera).id();

        app.world_mut()
            .resource_mut::<EnvironmentReflection>()
            .show(Handle::weak_from_u128(77));
        app.update();

        assert!(app.world().resource::<EnvironmentReflection>().is_pending());
        assert!(app.world().get::<EnvironmentMapLight>(camera).is_none());
    }
}
