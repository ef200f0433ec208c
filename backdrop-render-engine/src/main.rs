mod engine;
mod rpc;

use bevy::prelude::*;

use crate::engine::core::app_setup::{create_app, create_fail_closed_app};
use crate::engine::core::capability::{detect_device_profile, check_rendering_context};

fn main() {
    let mut app = match check_rendering_context() {
        Ok(()) => create_app(detect_device_profile().classify()),
        Err(error) => {
            let mut app = create_fail_closed_app(error.clone());
            warn!("Backdrop disabled: {}", error);
            app.world_mut()
                .resource_mut::<crate::rpc::web_rpc::WebRpcInterface>()
                .send_notification(
                    "context_unavailable",
                    serde_json::json!({ "reason": error.to_string() }),
                );
            app
        }
    };

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}
