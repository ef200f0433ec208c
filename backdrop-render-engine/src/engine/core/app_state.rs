use bevy::prelude::*;
use serde::Serialize;

use crate::engine::loading::progress::LoadingProgress;
use crate::rpc::web_rpc::WebRpcInterface;

/// Lifecycle of the backdrop controller.
///
/// `Uninitialized` lasts until the rendering context, camera and lights exist.
/// `Loading` ticks the scene while the initial background and model are
/// outstanding; the tick tolerates either one being absent. `Running` is entered
/// once both have settled, successfully or not. `Disposed` is terminal.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackdropState {
    #[default]
    Uninitialized,
    Loading,
    Running,
    Disposed,
}

#[derive(Component)]
pub struct FpsText;

/// Run condition for the per-frame tick.
pub fn scene_is_live(state: Res<State<BackdropState>>) -> bool {
    matches!(state.get(), BackdropState::Loading | BackdropState::Running)
}

// Startup has built the context and issued every initial load.
pub fn transition_to_loading(mut next_state: ResMut<NextState<BackdropState>>) {
    info!("→ Scene context ready, entering Loading state");
    next_state.set(BackdropState::Loading);
}

// Both initial assets have either arrived or failed.
pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<BackdropState>>,
) {
    if loading_progress.is_settled() {
        info!(
            "→ Initial assets settled (background: {}, model: {}), entering Running state",
            loading_progress.background_ready, loading_progress.model_ready
        );
        next_state.set(BackdropState::Running);
    }
}

pub fn announce_running(
    mut rpc_interface: ResMut<WebRpcInterface>,
    loading_progress: Res<LoadingProgress>,
) {
    rpc_interface.send_notification(
        "scene_ready",
        serde_json::json!({
            "background_loaded": loading_progress.background_ready,
            "model_loaded": loading_progress.model_ready,
        }),
    );
}
