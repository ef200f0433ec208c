use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use bevy::render::camera::ClearColorConfig;
use bevy::window::{PrimaryWindow, WindowResized};
use constants::render_settings::{
    CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_POSITION, MAX_RENDER_PIXELS,
};

use crate::engine::core::lifecycle::SceneEntity;

#[derive(Component)]
pub struct BackdropCamera;

/// Render target size for a viewport, after the pixel budget.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct RenderBudget {
    pub viewport: Vec2,
    pub resolution: UVec2,
    /// Uniform downscale in `(0, 1]` applied to reach `resolution`.
    pub scale: f32,
}

/// Fit a viewport into the pixel budget. Pixel ratio is taken as 1, empty
/// dimensions count as 1 and the aspect ratio is preserved.
pub fn render_budget(viewport: Vec2) -> RenderBudget {
    let viewport = viewport.max(Vec2::ONE);
    let area = viewport.x * viewport.y;
    let scale = if area > MAX_RENDER_PIXELS {
        (MAX_RENDER_PIXELS / area).sqrt()
    } else {
        1.0
    };
    let resolution = (viewport * scale).round().max(Vec2::ONE).as_uvec2();

    RenderBudget {
        viewport,
        resolution,
        scale,
    }
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Tonemapping::None,
        Transform::from_translation(CAMERA_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        BackdropCamera,
        SceneEntity,
        Name::new("Backdrop Camera"),
    ));
}

/// Re-derive the render resolution on resize. The camera's aspect ratio follows
/// the window automatically.
pub fn apply_render_budget(
    mut resized: EventReader<WindowResized>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut budget: ResMut<RenderBudget>,
) {
    let first_frame = budget.resolution == UVec2::ZERO;
    if resized.read().count() == 0 && !first_frame {
        return;
    }

    let Ok(mut window) = windows.single_mut() else {
        return;
    };

    let next = render_budget(Vec2::new(window.width(), window.height()));
    if next == *budget {
        return;
    }
    *budget = next;
    debug!(
        "Render resolution {}x{} (scale {:.3})",
        next.resolution.x, next.resolution.y, next.scale
    );

    // Desktop windows keep their native density.
    if cfg!(target_arch = "wasm32") {
        window.resolution.set_scale_factor_override(Some(next.scale));
    }
}
