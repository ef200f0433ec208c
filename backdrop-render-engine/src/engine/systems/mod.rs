//! Runtime systems outside the per-frame tick.
//!
//! Provides FPS tracking, the one-shot teardown on disposal and the native
//! development shortcuts.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the host page via RPC and updates the native overlay.
pub mod fps_tracking;

/// Native keyboard shortcuts standing in for the host page's navigation.
#[cfg(not(target_arch = "wasm32"))]
pub mod shortcuts;

/// Release of every scene resource when the controller is disposed.
pub mod teardown;
