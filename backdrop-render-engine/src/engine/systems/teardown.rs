use bevy::prelude::*;

use crate::engine::background::controller::BackgroundController;
use crate::engine::core::lifecycle::SceneEntity;
use crate::engine::loading::model_loader::{ModelLoader, ModelMaterials};
use crate::engine::scene::environment::EnvironmentReflection;
use crate::rpc::web_rpc::WebRpcInterface;

/// Release the scene exactly once. Entities go first so every GPU resource they
/// hold is dropped, then caches and shared materials, then the app stops.
pub fn teardown_scene(
    mut commands: Commands,
    entities: Query<Entity, With<SceneEntity>>,
    controller: Option<ResMut<BackgroundController>>,
    mut environment: ResMut<EnvironmentReflection>,
    mut loader: ResMut<ModelLoader>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut exit: EventWriter<AppExit>,
) {
    let mut despawned = 0;
    for entity in &entities {
        commands.entity(entity).try_despawn();
        despawned += 1;
    }

    if let Some(mut controller) = controller {
        controller.release();
    }
    environment.release();
    commands.remove_resource::<ModelMaterials>();
    loader.reset();

    info!("✓ Scene disposed ({} entities released)", despawned);
    rpc_interface.send_notification("disposed", serde_json::json!({}));
    exit.write(AppExit::Success);
}

/// Unsubscribe page listeners and detach the canvas.
#[cfg(target_arch = "wasm32")]
pub fn release_dom(mut listeners: NonSendMut<crate::engine::core::dom::DomListeners>) {
    listeners.remove_all();
    crate::engine::core::dom::remove_canvas();
}
