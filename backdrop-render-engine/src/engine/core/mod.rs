//! Core application setup and state management.
//!
//! Handles the controller lifecycle, window configuration, device capability
//! detection and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the backdrop materials, asset loading systems,
/// the per-frame tick and platform-specific configuration.
pub mod app_setup;

/// Controller state machine and the loading-to-running transition.
pub mod app_state;

/// Device capability tier and rendering context probing.
pub mod capability;

/// Browser integration: DOM listener registry and canvas removal.
#[cfg(target_arch = "wasm32")]
pub mod dom;

/// Error types for the fallible boundaries of the engine.
pub mod error;

/// Cancellation of in-flight work and the one-shot teardown path.
pub mod lifecycle;

/// Asset path configuration and base path resolution.
pub mod settings;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
