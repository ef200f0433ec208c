//! Per-frame animation: the signal snapshot, scroll-to-keyframe mapping and
//! the model's smoothed motion.

/// Snapshot of the external signals taken at the start of each tick.
pub mod frame;

/// Scroll smoothing and keyframe interpolation.
pub mod keyframes;

/// Model scale, offset and rotation driven by scroll and pointer.
pub mod model_motion;
