//! External signals feeding the frame loop: pointer motion and scroll position.
//!
//! Each signal has exactly one writer here; the frame loop reads them once
//! per tick through [`crate::engine::animation::frame::FrameSignals`].

/// Pointer speed and orientation tracking.
pub mod pointer;

/// Raw scroll target written by the host or the mouse wheel.
pub mod scroll;
