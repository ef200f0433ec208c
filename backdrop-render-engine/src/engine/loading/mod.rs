//! Asynchronous loading of the scene model and tracking of the initial loads.
//!
//! Background images go through [`crate::engine::background`]; this module
//! covers the single glTF model and the progress record that decides when the
//! controller leaves `Loading`.

/// glTF model loading, material substitution and normalisation.
pub mod model_loader;

/// Loading progress resource for state transitions.
pub mod progress;
