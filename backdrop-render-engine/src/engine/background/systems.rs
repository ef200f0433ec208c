use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use constants::render_settings::{BACKGROUND_QUAD_DEPTH, BACKGROUND_QUAD_SIZE};

use crate::engine::animation::frame::FrameSignals;
use crate::engine::assets::texture_cache::BackgroundImageSource;
use crate::engine::background::controller::{
    BackgroundController, BackgroundUpdate, TransitionOutcome,
};
use crate::engine::core::capability::FidelityTier;
use crate::engine::core::lifecycle::{SceneEntity, SceneLifetime};
use crate::engine::core::settings::BackdropSettings;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::materials::backdrop::{BackdropMaterial, lite_background_material};
use crate::engine::scene::environment::EnvironmentReflection;
use crate::rpc::web_rpc::WebRpcInterface;

/// Request to move the background to a named image.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub asset: String,
}

/// Material driving the background quad, by tier.
#[derive(Debug, Clone)]
pub enum BackgroundSurface {
    Composited(Handle<BackdropMaterial>),
    Plain(Handle<StandardMaterial>),
}

#[derive(Component, Debug, Clone)]
pub struct BackgroundQuad {
    pub surface: BackgroundSurface,
}

/// Everything needed to realise a [`BackgroundUpdate`] in the scene.
#[derive(SystemParam)]
pub struct BackgroundSurfaces<'w, 's> {
    commands: Commands<'w, 's>,
    tier: Res<'w, FidelityTier>,
    meshes: ResMut<'w, Assets<Mesh>>,
    composited: ResMut<'w, Assets<BackdropMaterial>>,
    plain: ResMut<'w, Assets<StandardMaterial>>,
    environment: ResMut<'w, EnvironmentReflection>,
    quads: Query<'w, 's, &'static BackgroundQuad>,
}

impl BackgroundSurfaces<'_, '_> {
    fn apply(&mut self, update: BackgroundUpdate) {
        match update {
            BackgroundUpdate::Spawn { asset, texture } => {
                self.environment.show(texture.clone());
                self.spawn_quad(&asset, texture);
            }
            BackgroundUpdate::BeginCrossfade { texture } => {
                self.environment.show(texture.clone());
                self.with_composited(|material| {
                    material.next = texture.clone();
                    material.uniforms.mix = 0.0;
                });
            }
            BackgroundUpdate::Blend(mix) => {
                self.with_composited(|material| material.uniforms.mix = mix);
            }
            BackgroundUpdate::Promote { texture } => {
                self.with_composited(|material| {
                    material.current = texture.clone();
                    material.uniforms.mix = 0.0;
                });
            }
            BackgroundUpdate::Swap { texture } => {
                self.environment.show(texture.clone());
                for quad in &self.quads {
                    match &quad.surface {
                        BackgroundSurface::Plain(handle) => {
                            if let Some(material) = self.plain.get_mut(handle) {
                                material.base_color_texture = Some(texture.clone());
                            }
                        }
                        BackgroundSurface::Composited(handle) => {
                            if let Some(material) = self.composited.get_mut(handle) {
                                *material = BackdropMaterial::showing(texture.clone());
                            }
                        }
                    }
                }
            }
            BackgroundUpdate::Failed { .. } => {}
        }
    }

    fn with_composited(&mut self, mut change: impl FnMut(&mut BackdropMaterial)) {
        for quad in &self.quads {
            if let BackgroundSurface::Composited(handle) = &quad.surface {
                if let Some(material) = self.composited.get_mut(handle) {
                    change(material);
                }
            }
        }
    }

    fn spawn_quad(&mut self, asset: &str, texture: Handle<Image>) {
        let mesh = self
            .meshes
            .add(Rectangle::new(BACKGROUND_QUAD_SIZE, BACKGROUND_QUAD_SIZE));
        let transform = Transform::from_xyz(0.0, 0.0, BACKGROUND_QUAD_DEPTH);

        match *self.tier {
            FidelityTier::Full => {
                let handle = self.composited.add(BackdropMaterial::showing(texture));
                self.commands.spawn((
                    Mesh3d(mesh),
                    MeshMaterial3d(handle.clone()),
                    transform,
                    BackgroundQuad {
                        surface: BackgroundSurface::Composited(handle),
                    },
                    SceneEntity,
                    Name::new("Background"),
                ));
            }
            FidelityTier::Reduced => {
                let handle = self.plain.add(lite_background_material(texture));
                self.commands.spawn((
                    Mesh3d(mesh),
                    MeshMaterial3d(handle.clone()),
                    transform,
                    BackgroundQuad {
                        surface: BackgroundSurface::Plain(handle),
                    },
                    SceneEntity,
                    Name::new("Background"),
                ));
            }
        }

        info!("✓ Background quad created with {}", asset);
    }
}

pub fn setup_background(
    mut commands: Commands,
    tier: Res<FidelityTier>,
    settings: Res<BackdropSettings>,
    asset_server: Res<AssetServer>,
    lifetime: Res<SceneLifetime>,
) {
    let mut controller = BackgroundController::new(*tier, settings.coalesce_in_flight_loads);
    let mut source = BackgroundImageSource::new(&asset_server, &settings);
    controller.begin_initial(&settings.initial_image, &mut source, lifetime.token());
    commands.insert_resource(controller);
}

pub fn handle_transition_requests(
    mut requests: EventReader<TransitionRequest>,
    mut controller: ResMut<BackgroundController>,
    settings: Res<BackdropSettings>,
    asset_server: Res<AssetServer>,
    lifetime: Res<SceneLifetime>,
    mut surfaces: BackgroundSurfaces,
) {
    for request in requests.read() {
        let mut source = BackgroundImageSource::new(&asset_server, &settings);
        match controller.request_transition(&request.asset, &mut source, lifetime.token()) {
            TransitionOutcome::Applied(update) => surfaces.apply(update),
            TransitionOutcome::Loading => info!("Loading background {}", request.asset),
            TransitionOutcome::Joined => {
                debug!("Background {} already loading, request joined", request.asset)
            }
            TransitionOutcome::AlreadyCurrent => {
                debug!("Background {} already showing", request.asset)
            }
            TransitionOutcome::NoBackground => {
                debug!("No background yet, ignoring transition to {}", request.asset)
            }
        }
    }
}

pub fn complete_texture_loads(
    mut controller: ResMut<BackgroundController>,
    settings: Res<BackdropSettings>,
    asset_server: Res<AssetServer>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut surfaces: BackgroundSurfaces,
) {
    if controller.pending_loads() == 0 {
        return;
    }

    let source = BackgroundImageSource::new(&asset_server, &settings);
    for update in controller.poll_loads(&source) {
        match update {
            BackgroundUpdate::Failed { error, initial } => {
                warn!("{}", error);
                rpc_interface.notify_asset_failure(&error);
                if initial {
                    loading_progress.settle_background(false);
                }
            }
            BackgroundUpdate::Spawn { .. } => {
                loading_progress.settle_background(true);
                surfaces.apply(update);
            }
            other => surfaces.apply(other),
        }
    }
}

pub fn advance_crossfade(
    signals: Res<FrameSignals>,
    mut controller: ResMut<BackgroundController>,
    mut surfaces: BackgroundSurfaces,
) {
    surfaces.with_composited(|material| material.uniforms.time = signals.elapsed);

    if let Some(update) = controller.advance(signals.delta) {
        surfaces.apply(update);
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    fn surface_app(tier: FidelityTier) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(tier)
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<BackdropMaterial>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<Assets<Image>>()
            .init_resource::<EnvironmentReflection>();
        app
    }

    fn apply_once(app: &mut App, update: BackgroundUpdate) {
        let system = move |mut surfaces: BackgroundSurfaces| surfaces.apply(update.clone());
        let _ = app.world_mut().run_system_once(system);
    }

    fn composited_material(app: &mut App) -> BackdropMaterial {
        let world = app.world_mut();
        let quad = world
            .query::<&BackgroundQuad>()
            .single(world)
            .expect("one background quad")
            .clone();
        let BackgroundSurface::Composited(handle) = quad.surface else {
            panic!("expected composited background");
        };
        world
            .resource::<Assets<BackdropMaterial>>()
            .get(&handle)
            .expect("material exists")
            .clone()
    }

    #[test]
    fn full_tier_quad_crossfades_and_promotes() {
        let mut app = surface_app(FidelityTier::Full);
        let first = Handle::<Image>::weak_from_u128(11);
        let second = Handle::<Image>::weak_from_u128(12);

        apply_once(
            &mut app,
            BackgroundUpdate::Spawn {
                asset: "1-min.jpg".to_string(),
                texture: first.clone(),
            },
        );

        let material = composited_material(&mut app);
        assert_eq!(material.current, first);
        assert_eq!(material.next, first);
        assert_eq!(material.uniforms.mix, 0.0);
        assert!(app.world().resource::<EnvironmentReflection>().is_pending());

        apply_once(
            &mut app,
            BackgroundUpdate::BeginCrossfade {
                texture: second.clone(),
            },
        );
        apply_once(&mut app, BackgroundUpdate::Blend(0.5));
        let material = composited_material(&mut app);
        assert_eq!(material.next, second);
        assert_eq!(material.uniforms.mix, 0.5);

        apply_once(
            &mut app,
            BackgroundUpdate::Promote {
                texture: second.clone(),
            },
        );
        let material = composited_material(&mut app);
        assert_eq!(material.current, second);
        assert_eq!(material.uniforms.mix, 0.0);
    }

    #[test]
    fn reduced_tier_quad_swaps_texture() {
        let mut app = surface_app(FidelityTier::Reduced);
        let first = Handle::<Image>::weak_from_u128(21);
        let second = Handle::<Image>::weak_from_u128(22);

        apply_once(
            &mut app,
            BackgroundUpdate::Spawn {
                asset: "1-min.jpg".to_string(),
                texture: first,
            },
        );
        apply_once(
            &mut app,
            BackgroundUpdate::Swap {
                texture: second.clone(),
            },
        );

        let world = app.world_mut();
        let quad = world
            .query::<&BackgroundQuad>()
            .single(world)
            .expect("one background quad")
            .clone();
        let BackgroundSurface::Plain(handle) = quad.surface else {
            panic!("expected plain background");
        };
        let material = world
            .resource::<Assets<StandardMaterial>>()
            .get(&handle)
            .expect("material exists");
        assert_eq!(material.base_color_texture, Some(second));
        assert!(material.unlit);
        assert!(world.resource::<EnvironmentReflection>().is_pending());
    }
}
