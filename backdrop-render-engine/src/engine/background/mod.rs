//! Background quad and its crossfade between named images.
//!
//! [`controller::BackgroundController`] holds the texture cache, outstanding
//! loads and the crossfade. The systems in [`systems`] feed it requests and
//! push the resulting changes into whichever background material the fidelity
//! tier selected.

pub mod controller;
pub mod crossfade;
pub mod systems;
