//! JSON-RPC 2.0 communication layer between the host page and the backdrop.
//!
//! Implements bidirectional messaging via `postMessage`, supporting both
//! request-response and notification patterns.
//!
//! ## Architecture
//!
//! - **Requests**: carry an `id` and receive a response with the same `id`
//! - **Notifications**: carry no `id`; they are executed but never answered
//! - **Responses**: reply to requests with a result or an error
//!
//! ## Message Flow
//!
//! ```text
//! Host page  <──postMessage──>  Backdrop (wasm)
//!     │                              │
//!     ├─ Request (with ID) ────────> │
//!     │                              ├─ Execute command
//!     │ <──────── Response (with ID) ┤
//!     │                              │
//!     │ <───── Notification (no ID) ─┤
//! ```
//!
//! ## Methods
//!
//! - `request_transition { asset }`: crossfade the background to an image
//! - `activate_section { key }`: show the background of a navigation section
//! - `set_scroll_target { progress }`: raw scroll fraction in `[0, 1]`
//! - `dispose`: tear the scene down; answered before the engine stops
//! - `get_scene_status`: lifecycle state, fidelity tier and load status
//! - `get_fps`: current smoothed frame rate
//!
//! ## Notifications sent to the host
//!
//! - `scene_ready`: both initial loads settled
//! - `asset_load_failed { asset, reason }`: an image or the model failed to load
//! - `fps_update { fps }`: every half second
//! - `disposed`: teardown finished
//! - `context_unavailable { reason }`: no rendering context; the backdrop stays off
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error

/// Host command handlers for the live scene and the fail-closed fallback.
pub mod handlers;

/// JSON-RPC 2.0 message types, outgoing queue and the page transport.
pub mod web_rpc;
