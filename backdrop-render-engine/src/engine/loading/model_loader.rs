use bevy::asset::LoadState;
use bevy::ecs::system::SystemParam;
use bevy::gltf::{Gltf, GltfMaterialName};
use bevy::math::Affine3A;
use bevy::prelude::*;
use bevy::render::mesh::MeshAabb;
use bevy::scene::SceneInstanceReady;
use constants::materials::{GLASS_MATERIAL_TAG, SWIRL_MATERIAL_TAG};
use constants::render_settings::MODEL_TARGET_SIZE;

use crate::engine::animation::model_motion::{ModelMotion, ModelRig};
use crate::engine::core::capability::FidelityTier;
use crate::engine::core::error::BackdropError;
use crate::engine::core::lifecycle::{CancellationToken, SceneEntity, SceneLifetime};
use crate::engine::core::settings::BackdropSettings;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::materials::glass::glass_material;
use crate::engine::materials::swirl::{SwirlHandle, SwirlLiteMaterial, SwirlMaterial};
use crate::engine::scene::bounds::{Bounds, ModelNormalization};
use crate::rpc::web_rpc::WebRpcInterface;

/// Material family a glTF part is swapped to, picked from its material name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialTag {
    Glass,
    Swirl,
}

impl MaterialTag {
    /// Case-insensitive substring match. Swirl wins when both tags appear.
    pub fn classify(material_name: &str) -> Option<Self> {
        let name = material_name.to_lowercase();
        if name.contains(SWIRL_MATERIAL_TAG) {
            Some(MaterialTag::Swirl)
        } else if name.contains(GLASS_MATERIAL_TAG) {
            Some(MaterialTag::Glass)
        } else {
            None
        }
    }
}

#[derive(Debug, Default)]
enum ModelStage {
    #[default]
    Idle,
    Loading {
        path: String,
        handle: Handle<Gltf>,
        token: CancellationToken,
    },
    Spawned {
        rig: Entity,
        pivot: Entity,
    },
    Failed,
}

#[derive(Resource, Debug, Default)]
pub struct ModelLoader {
    stage: ModelStage,
}

impl ModelLoader {
    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        matches!(self.stage, ModelStage::Spawned { .. })
    }

    pub fn reset(&mut self) {
        self.stage = ModelStage::Idle;
    }
}

/// Substitute materials shared by every tagged part of the model.
#[derive(Resource, Debug, Clone)]
pub struct ModelMaterials {
    pub glass: Handle<StandardMaterial>,
    pub swirl: SwirlHandle,
}

#[derive(Component)]
pub struct ModelPivot;

pub fn start_model_load(
    mut loader: ResMut<ModelLoader>,
    settings: Res<BackdropSettings>,
    asset_server: Res<AssetServer>,
    lifetime: Res<SceneLifetime>,
) {
    let path = settings.model_path();
    info!("Loading model {}", path);
    loader.stage = ModelStage::Loading {
        handle: asset_server.load(path.clone()),
        path,
        token: lifetime.token(),
    };
}

/// Spawn the model hierarchy once the glTF document is available:
/// rig (animated) → pivot (centring offset) → scene root.
#[allow(clippy::too_many_arguments)]
pub fn spawn_loaded_model(
    mut commands: Commands,
    mut loader: ResMut<ModelLoader>,
    gltfs: Res<Assets<Gltf>>,
    asset_server: Res<AssetServer>,
    tier: Res<FidelityTier>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    mut swirl_materials: ResMut<Assets<SwirlMaterial>>,
    mut swirl_lite_materials: ResMut<Assets<SwirlLiteMaterial>>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let ModelStage::Loading {
        path,
        handle,
        token,
    } = &loader.stage
    else {
        return;
    };

    if token.is_cancelled() {
        loader.stage = ModelStage::Idle;
        return;
    }

    let scene = match asset_server.get_load_state(handle) {
        Some(LoadState::Loaded) => match gltfs.get(handle) {
            Some(gltf) => gltf
                .default_scene
                .clone()
                .or_else(|| gltf.scenes.first().cloned())
                .ok_or_else(|| BackdropError::EmptyModel { path: path.clone() }),
            None => return,
        },
        Some(LoadState::Failed(error)) => Err(BackdropError::ModelLoad {
            path: path.clone(),
            reason: error.to_string(),
        }),
        _ => return,
    };

    let scene = match scene {
        Ok(scene) => scene,
        Err(error) => {
            warn!("{}", error);
            rpc_interface.notify_asset_failure(&error);
            loading_progress.settle_model(false);
            loader.stage = ModelStage::Failed;
            return;
        }
    };

    commands.insert_resource(ModelMaterials {
        glass: standard_materials.add(glass_material(*tier)),
        swirl: SwirlHandle::create(*tier, &mut swirl_materials, &mut swirl_lite_materials),
    });

    // Hidden until normalised so the raw transform is never drawn.
    let rig = commands
        .spawn((
            Transform::default(),
            Visibility::Hidden,
            SceneEntity,
            Name::new("Model Rig"),
        ))
        .id();
    let pivot = commands
        .spawn((
            Transform::default(),
            Visibility::Inherited,
            ModelPivot,
            ChildOf(rig),
        ))
        .id();
    commands
        .spawn((SceneRoot(scene), ChildOf(pivot)))
        .observe(prepare_model);

    info!("✓ Model document loaded, instancing scene");
    loader.stage = ModelStage::Spawned { rig, pivot };
}

/// Local-to-`root` transform of `entity`, composed from local transforms so it
/// is valid before transform propagation has run.
fn affine_to_root(
    entity: Entity,
    root: Entity,
    parents: &Query<&ChildOf>,
    transforms: &Query<&Transform>,
) -> Affine3A {
    let mut affine = Affine3A::IDENTITY;
    let mut current = entity;
    while current != root {
        if let Ok(transform) = transforms.get(current) {
            affine = transform.compute_affine() * affine;
        }
        match parents.get(current) {
            Ok(child_of) => current = child_of.parent(),
            Err(_) => break,
        }
    }
    affine
}

/// Everything the model needs once its scene instance exists.
#[derive(SystemParam)]
pub struct ModelPreparation<'w, 's> {
    commands: Commands<'w, 's>,
    loader: Res<'w, ModelLoader>,
    lifetime: Res<'w, SceneLifetime>,
    model_materials: Option<Res<'w, ModelMaterials>>,
    meshes: Res<'w, Assets<Mesh>>,
    children: Query<'w, 's, &'static Children>,
    parents: Query<'w, 's, &'static ChildOf>,
    transforms: Query<'w, 's, &'static Transform>,
    parts: Query<'w, 's, (&'static Mesh3d, Option<&'static GltfMaterialName>)>,
    loading_progress: ResMut<'w, LoadingProgress>,
}

impl ModelPreparation<'_, '_> {
    /// Substitute tagged materials below `root`, then normalise the rig.
    /// A scene that finishes instancing after disposal is left untouched.
    pub fn prepare(&mut self, root: Entity) {
        if self.lifetime.is_disposed() {
            return;
        }
        let ModelStage::Spawned { rig, pivot } = self.loader.stage else {
            return;
        };

        let mut bounds = Bounds::default();
        let mut substituted = 0;

        for entity in self.children.iter_descendants(root) {
            let Ok((mesh, material_name)) = self.parts.get(entity) else {
                continue;
            };

            if let Some(aabb) = self.meshes.get(&mesh.0).and_then(|mesh| mesh.compute_aabb()) {
                let affine = affine_to_root(entity, root, &self.parents, &self.transforms);
                bounds.include_box(aabb.center.into(), aabb.half_extents.into(), &affine);
            }

            let (Some(materials), Some(tag)) = (
                self.model_materials.as_deref(),
                material_name.and_then(|name| MaterialTag::classify(&name.0)),
            ) else {
                continue;
            };

            let mut part = self.commands.entity(entity);
            match tag {
                MaterialTag::Glass => {
                    part.insert(MeshMaterial3d(materials.glass.clone()));
                }
                MaterialTag::Swirl => {
                    part.remove::<MeshMaterial3d<StandardMaterial>>();
                    match &materials.swirl {
                        SwirlHandle::Full(handle) => part.insert(MeshMaterial3d(handle.clone())),
                        SwirlHandle::Lite(handle) => part.insert(MeshMaterial3d(handle.clone())),
                    };
                }
            }
            substituted += 1;
        }

        let normalization = ModelNormalization::from_bounds(&bounds, MODEL_TARGET_SIZE);
        self.commands
            .entity(pivot)
            .insert(normalization.pivot_transform());
        self.commands.entity(rig).insert((
            Transform::from_scale(Vec3::splat(normalization.base_scale)),
            ModelRig { normalization },
            ModelMotion::default(),
            Visibility::Visible,
        ));

        info!(
            "✓ Model ready: {} parts substituted, scale {:.4}, half height {:.4}",
            substituted, normalization.base_scale, normalization.half_height
        );
        self.loading_progress.settle_model(true);
    }
}

fn prepare_model(trigger: Trigger<SceneInstanceReady>, mut preparation: ModelPreparation) {
    preparation.prepare(trigger.target());
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;
    use bevy::scene::{Scene, SceneSpawner};

    use super::*;

    struct ModelScene {
        app: App,
        rig: Entity,
        pivot: Entity,
        root: Entity,
        glass_part: Entity,
        swirl_part: Entity,
        plain_part: Entity,
        glass: Handle<StandardMaterial>,
        placeholder: Handle<StandardMaterial>,
    }

    /// Rig, pivot and an instanced scene with a glass, a swirl and an untagged
    /// part, all 4 wide and centred at x = 10.
    fn model_scene() -> ModelScene {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<Assets<SwirlMaterial>>()
            .init_resource::<ModelLoader>()
            .init_resource::<SceneLifetime>()
            .init_resource::<LoadingProgress>();

        let world = app.world_mut();
        let mesh = world
            .resource_mut::<Assets<Mesh>>()
            .add(Cuboid::new(4.0, 2.0, 1.0));
        let (glass, placeholder) = {
            let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
            (
                materials.add(StandardMaterial::default()),
                materials.add(StandardMaterial::default()),
            )
        };
        let swirl = world
            .resource_mut::<Assets<SwirlMaterial>>()
            .add(SwirlMaterial::default());
        world.insert_resource(ModelMaterials {
            glass: glass.clone(),
            swirl: SwirlHandle::Full(swirl),
        });

        let rig = world.spawn((Transform::default(), Visibility::Hidden)).id();
        let pivot = world.spawn((Transform::default(), ChildOf(rig))).id();
        let root = world.spawn((Transform::default(), ChildOf(pivot))).id();
        let group = world
            .spawn((Transform::from_xyz(10.0, 0.0, 0.0), ChildOf(root)))
            .id();

        let mut part = |name: Option<&str>| {
            let mut entity = world.spawn((
                Transform::default(),
                Mesh3d(mesh.clone()),
                MeshMaterial3d(placeholder.clone()),
                ChildOf(group),
            ));
            if let Some(name) = name {
                entity.insert(GltfMaterialName(name.to_string()));
            }
            entity.id()
        };
        let glass_part = part(Some("Glass_Outer"));
        let swirl_part = part(Some("Inner_Swirl"));
        let plain_part = part(None);

        world.resource_mut::<ModelLoader>().stage = ModelStage::Spawned { rig, pivot };
        world.entity_mut(root).observe(prepare_model);

        ModelScene {
            app,
            rig,
            pivot,
            root,
            glass_part,
            swirl_part,
            plain_part,
            glass,
            placeholder,
        }
    }

    fn instance_ready(app: &mut App, root: Entity) {
        let instance_id = SceneSpawner::default().spawn(Handle::<Scene>::default());
        app.world_mut()
            .trigger_targets(SceneInstanceReady { instance_id }, root);
        app.world_mut().flush();
    }

    #[test]
    fn instanced_scene_gets_materials_and_normalisation() {
        let ModelScene {
            mut app,
            rig,
            pivot,
            root,
            glass_part,
            swirl_part,
            plain_part,
            glass,
            placeholder,
        } = model_scene();

        instance_ready(&mut app, root);
        let world = app.world();

        assert_eq!(
            world
                .get::<MeshMaterial3d<StandardMaterial>>(glass_part)
                .map(|material| material.0.clone()),
            Some(glass)
        );
        assert!(world.get::<MeshMaterial3d<StandardMaterial>>(swirl_part).is_none());
        assert!(world.get::<MeshMaterial3d<SwirlMaterial>>(swirl_part).is_some());
        assert_eq!(
            world
                .get::<MeshMaterial3d<StandardMaterial>>(plain_part)
                .map(|material| material.0.clone()),
            Some(placeholder)
        );

        // Largest extent 4 normalised to MODEL_TARGET_SIZE, centred on the rig.
        let pivot_transform = world.get::<Transform>(pivot).expect("pivot transform");
        assert!((pivot_transform.translation - Vec3::new(-10.0, 0.0, 0.0)).length() < 1e-4);
        let rig_transform = world.get::<Transform>(rig).expect("rig transform");
        let expected_scale = MODEL_TARGET_SIZE / 4.0;
        assert!((rig_transform.scale - Vec3::splat(expected_scale)).length() < 1e-5);
        assert_eq!(world.get::<Visibility>(rig), Some(&Visibility::Visible));
        assert!(world.get::<ModelRig>(rig).is_some());
        assert!(world.get::<ModelMotion>(rig).is_some());

        let progress = world.resource::<LoadingProgress>();
        assert!(progress.model_settled && progress.model_ready);
        assert!(world.resource::<ModelLoader>().is_loaded());
    }

    #[test]
    fn scene_ready_after_dispose_is_discarded() {
        let ModelScene {
            mut app,
            rig,
            pivot,
            root,
            swirl_part,
            placeholder,
            ..
        } = model_scene();

        app.world().resource::<SceneLifetime>().token().cancel();
        instance_ready(&mut app, root);
        let world = app.world();

        assert_eq!(
            world
                .get::<MeshMaterial3d<StandardMaterial>>(swirl_part)
                .map(|material| material.0.clone()),
            Some(placeholder)
        );
        assert!(world.get::<MeshMaterial3d<SwirlMaterial>>(swirl_part).is_none());
        assert_eq!(world.get::<Transform>(pivot), Some(&Transform::default()));
        assert_eq!(world.get::<Visibility>(rig), Some(&Visibility::Hidden));
        assert!(world.get::<ModelRig>(rig).is_none());
        assert!(!world.resource::<LoadingProgress>().model_settled);
    }

    #[test]
    fn preparation_without_spawned_rig_does_nothing() {
        let ModelScene { mut app, root, .. } = model_scene();
        app.world_mut().resource_mut::<ModelLoader>().reset();

        app.world_mut()
            .run_system_once(move |mut preparation: ModelPreparation| {
                preparation.prepare(root)
            })
            .expect("system runs");

        assert_eq!(
            *app.world().resource::<LoadingProgress>(),
            LoadingProgress::default()
        );
    }

    #[test]
    fn material_names_match_case_insensitively() {
        assert_eq!(MaterialTag::classify("Glass_Outer"), Some(MaterialTag::Glass));
        assert_eq!(MaterialTag::classify("inner SWIRL"), Some(MaterialTag::Swirl));
        assert_eq!(MaterialTag::classify("frosted-glass-swirl"), Some(MaterialTag::Swirl));
        assert_eq!(MaterialTag::classify("Metal"), None);
        assert_eq!(MaterialTag::classify(""), None);
    }

    #[test]
    fn hierarchy_transforms_compose_up_to_root() {
        let mut app = App::new();
        let root = app.world_mut().spawn(Transform::from_xyz(100.0, 0.0, 0.0)).id();
        let middle = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 2.0, 0.0), ChildOf(root)))
            .id();
        let leaf = app
            .world_mut()
            .spawn((Transform::from_scale(Vec3::splat(3.0)), ChildOf(middle)))
            .id();

        let affine = app
            .world_mut()
            .run_system_once(
                move |parents: Query<&ChildOf>, transforms: Query<&Transform>| {
                    affine_to_root(leaf, root, &parents, &transforms)
                },
            )
            .expect("system runs");

        let point = affine.transform_point3(Vec3::ONE);
        assert!((point - Vec3::new(3.0, 5.0, 3.0)).length() < 1e-6);
    }
}
