use bevy::diagnostic::DiagnosticsStore;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::engine::assets::section_manifest::SectionDirectory;
use crate::engine::background::controller::BackgroundController;
use crate::engine::background::systems::TransitionRequest;
use crate::engine::core::app_state::BackdropState;
use crate::engine::core::capability::FidelityTier;
use crate::engine::core::error::BackdropError;
use crate::engine::core::lifecycle::DisposeRequest;
use crate::engine::input::scroll::ScrollTarget;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::systems::fps_tracking::smoothed_fps;
use crate::rpc::web_rpc::{IncomingRpcMessage, RpcError, WebRpcInterface, process_request};

#[derive(Deserialize)]
struct TransitionParams {
    asset: String,
}

#[derive(Deserialize)]
struct SectionParams {
    key: String,
}

#[derive(Deserialize)]
struct ScrollParams {
    progress: f32,
}

fn parse_params<T: DeserializeOwned>(method: &str, params: &Value) -> Result<T, RpcError> {
    serde_json::from_value(params.clone())
        .map_err(|e| RpcError::invalid_params(&format!("Invalid params for {}: {}", method, e)))
}

/// Everything the host's commands can read or change in a live scene.
#[derive(SystemParam)]
pub struct SceneCommands<'w> {
    transitions: EventWriter<'w, TransitionRequest>,
    dispose: EventWriter<'w, DisposeRequest>,
    scroll: ResMut<'w, ScrollTarget>,
    sections: Res<'w, SectionDirectory>,
    state: Res<'w, State<BackdropState>>,
    tier: Res<'w, FidelityTier>,
    progress: Res<'w, LoadingProgress>,
    background: Option<Res<'w, BackgroundController>>,
    diagnostics: Res<'w, DiagnosticsStore>,
}

impl SceneCommands<'_> {
    fn execute(&mut self, method: &str, params: &Value) -> Result<Value, RpcError> {
        let disposed = *self.state.get() == BackdropState::Disposed;

        match method {
            "get_scene_status" => Ok(self.status()),
            "get_fps" => Ok(json!({ "fps": smoothed_fps(&self.diagnostics) })),
            "request_transition" | "activate_section" | "set_scroll_target" | "dispose"
                if disposed =>
            {
                debug!("Ignoring {} after disposal", method);
                Ok(json!({ "accepted": false }))
            }
            "request_transition" => {
                let TransitionParams { asset } = parse_params(method, params)?;
                if asset.trim().is_empty() {
                    return Err(RpcError::invalid_params("asset must not be empty"));
                }
                self.transitions.write(TransitionRequest { asset });
                Ok(json!({ "accepted": true }))
            }
            "activate_section" => {
                let SectionParams { key } = parse_params(method, params)?;
                let asset = self.sections.resolve(&key)?.to_string();
                self.transitions.write(TransitionRequest {
                    asset: asset.clone(),
                });
                Ok(json!({ "accepted": true, "asset": asset }))
            }
            "set_scroll_target" => {
                let ScrollParams { progress } = parse_params(method, params)?;
                self.scroll.set(progress);
                Ok(json!({ "progress": self.scroll.get() }))
            }
            "dispose" => {
                self.dispose.write(DisposeRequest);
                Ok(json!({ "accepted": true }))
            }
            _ => Err(RpcError::method_not_found(method)),
        }
    }

    fn status(&self) -> Value {
        let crossfade = self.background.as_ref().map(|controller| controller.crossfade());
        json!({
            "state": self.state.get(),
            "fidelity": *self.tier,
            "background_loaded": self.progress.background_ready,
            "model_loaded": self.progress.model_ready,
            "is_fading": crossfade.is_some_and(|fade| fade.is_fading()),
            "fade_progress": crossfade.map_or(0.0, |fade| fade.progress()),
            "current_background": self
                .background
                .as_ref()
                .and_then(|controller| controller.current_asset()),
        })
    }
}

pub fn handle_scene_commands(
    mut messages: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut scene: SceneCommands,
) {
    for message in messages.read() {
        if let Some(response) =
            process_request(&message.content, |method, params| scene.execute(method, params))
        {
            rpc_interface.queue_response(response);
        }
    }
}

/// Why the scene never started. Present only in the fail-closed app.
#[derive(Resource, Debug, Clone)]
pub struct ContextFailure(pub BackdropError);

/// Commands accepted when no rendering context could be created. `dispose`
/// still tears down the page integration; everything else reports the failure.
pub fn handle_fail_closed_commands(
    mut messages: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    failure: Res<ContextFailure>,
    mut dispose: EventWriter<DisposeRequest>,
) {
    for message in messages.read() {
        let response = process_request(&message.content, |method, _params| match method {
            "dispose" => {
                dispose.write(DisposeRequest);
                Ok(json!({ "accepted": true }))
            }
            "get_scene_status" => Ok(json!({
                "state": BackdropState::Uninitialized,
                "error": failure.0.to_string(),
                "kind": failure.0.kind(),
            })),
            "request_transition" | "activate_section" | "set_scroll_target" | "get_fps" => {
                Err(failure.0.clone().into())
            }
            _ => Err(RpcError::method_not_found(method)),
        });

        if let Some(response) = response {
            rpc_interface.queue_response(response);
        }
    }
}

/// Acknowledge the first dispose of a fail-closed app and stop it.
pub fn finish_fail_closed(
    mut requests: EventReader<DisposeRequest>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut exit: EventWriter<AppExit>,
    mut finished: Local<bool>,
) {
    if requests.read().count() == 0 || *finished {
        return;
    }

    *finished = true;
    info!("✓ Fail-closed controller disposed");
    rpc_interface.send_notification("disposed", json!({}));
    exit.write(AppExit::Success);
}
