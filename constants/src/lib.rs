//! Shared tuning data for the backdrop render engine.
//!
//! Everything here is immutable after startup: keyframes, smoothing factors,
//! light ranges, shader parameter defaults and asset naming.

pub mod asset_paths;
pub mod keyframes;
pub mod lighting;
pub mod materials;
pub mod pointer;
pub mod render_settings;
