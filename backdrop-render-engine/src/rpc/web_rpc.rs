use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::core::error::BackdropError;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::window;

/// JSON-RPC 2.0 request structure. A request without `id` is a notification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

impl RpcResponse {
    pub fn from_result(id: serde_json::Value, result: Result<serde_json::Value, RpcError>) -> Self {
        let (result, error) = match result {
            Ok(value) => (Some(value), None),
            Err(error) => (None, Some(error)),
        };
        Self {
            jsonrpc: "2.0".to_string(),
            result,
            error,
            id: Some(id),
        }
    }
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_request(message: &str) -> Self {
        Self {
            code: -32600,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

impl From<BackdropError> for RpcError {
    fn from(error: BackdropError) -> Self {
        let base = match error {
            BackdropError::UnknownSection(_) => RpcError::invalid_params(&error.to_string()),
            _ => RpcError::internal_error(&error.to_string()),
        };
        RpcError {
            data: Some(serde_json::json!({ "kind": error.kind() })),
            ..base
        }
    }
}

/// Resource managing bidirectional RPC communication between the host page and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Report a failed asset load to the host page.
    pub fn notify_asset_failure(&mut self, error: &BackdropError) {
        self.send_notification(
            "asset_load_failed",
            serde_json::json!({
                "asset": error.asset(),
                "kind": error.kind(),
                "reason": error.to_string(),
            }),
        );
    }

    /// Queue response for transmission to the host page.
    pub fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    #[cfg(test)]
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    #[cfg(test)]
    pub fn pending_responses(&self) -> &[RpcResponse] {
        &self.outgoing_responses
    }
}

/// Ordering of the RPC pipeline within `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum RpcSet {
    /// Move raw page messages into events.
    Receive,
    /// Execute commands. Scene systems reacting to them run after this set.
    Handle,
    /// Flush notifications and responses to the page.
    Send,
}

/// Transport plugin: page listener, incoming events and the outgoing flush.
/// Command handlers are added by the app into [`RpcSet::Handle`].
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .configure_sets(
                Update,
                (RpcSet::Receive, RpcSet::Handle, RpcSet::Send).chain(),
            )
            .add_systems(Update, process_incoming_messages.in_set(RpcSet::Receive))
            .add_systems(Update, send_outgoing_messages.in_set(RpcSet::Send));

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(
    mut commands: Commands,
    mut listeners: NonSendMut<crate::engine::core::dom::DomListeners>,
) {
    use std::sync::Arc;
    use std::sync::Mutex;
    use wasm_bindgen::JsCast;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    listeners.listen("message", move |event: web_sys::Event| {
        let Some(event) = event.dyn_ref::<web_sys::MessageEvent>() else {
            return;
        };

        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    });

    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the host page.
#[derive(Event, Debug, Clone)]
pub struct IncomingRpcMessage {
    pub content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Parse a raw message and run `execute` on it. Commands run whether or not the
/// request carries an `id`; only requests with an `id` get a response.
pub fn process_request(
    content: &str,
    execute: impl FnOnce(&str, &serde_json::Value) -> Result<serde_json::Value, RpcError>,
) -> Option<RpcResponse> {
    let request = match serde_json::from_str::<RpcRequest>(content) {
        Ok(request) => request,
        Err(parse_error) => {
            warn!("Discarding malformed RPC message: {}", parse_error);
            return None;
        }
    };

    if request.jsonrpc != "2.0" {
        warn!("Unsupported JSON-RPC version '{}'", request.jsonrpc);
        return request.id.map(|id| {
            RpcResponse::from_result(id, Err(RpcError::invalid_request("Expected jsonrpc 2.0")))
        });
    }

    debug!("Processing RPC method: {}", request.method);
    let result = execute(&request.method, &request.params);
    if let Err(error) = &result {
        debug!("RPC method {} failed: {}", request.method, error.message);
    }

    request.id.map(|id| RpcResponse::from_result(id, result))
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window (host page).
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}
