//! Fixed scene furniture and the model's spatial reference.
//!
//! Spawns the camera and lights, mirrors the background into the model's
//! reflections, tracks the render resolution budget and
//! computes the normalisation applied to a freshly loaded model.

/// Axis-aligned bounds and the normalisation derived from them.
pub mod bounds;

/// Perspective camera and the render resolution cap.
pub mod camera;

/// Background reflection on the model through the camera's environment light.
pub mod environment;

/// Ambient and directional light driven by the pointer signal.
pub mod lighting;
