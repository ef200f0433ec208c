//! Asset bookkeeping for background images and navigation sections.
//!
//! Handles the per-name texture cache, the load seam the background controller
//! issues requests through, and the section manifest mapping page sections to images.

/// Navigation section keys and the background image each one shows.
pub mod section_manifest;

/// Texture cache and the texture loading seam.
pub mod texture_cache;
