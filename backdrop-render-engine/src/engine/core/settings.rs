use bevy::prelude::*;
use constants::asset_paths::{
    IMAGES_ROOT, INITIAL_BACKGROUND, MODEL_FILE, MODELS_ROOT, SECTION_MANIFEST,
};

/// Prefix applied to every asset path, fixed at build time like a public URL.
const BUILD_BASE_PATH: Option<&str> = option_env!("BACKDROP_BASE_PATH");

/// Asset addressing and request policy for the backdrop controller.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct BackdropSettings {
    pub base_path: String,
    pub images_root: String,
    pub models_root: String,
    pub model_file: String,
    pub initial_image: String,
    pub section_manifest: String,
    /// Join a transition request onto an identical load that is already in flight
    /// instead of issuing another one.
    pub coalesce_in_flight_loads: bool,
}

impl Default for BackdropSettings {
    fn default() -> Self {
        Self {
            base_path: BUILD_BASE_PATH.unwrap_or_default().to_string(),
            images_root: IMAGES_ROOT.to_string(),
            models_root: MODELS_ROOT.to_string(),
            model_file: MODEL_FILE.to_string(),
            initial_image: INITIAL_BACKGROUND.to_string(),
            section_manifest: SECTION_MANIFEST.to_string(),
            coalesce_in_flight_loads: false,
        }
    }
}

impl BackdropSettings {
    /// Path of a background image by file name.
    pub fn image_path(&self, name: &str) -> String {
        self.resolve(&[&self.images_root, name])
    }

    /// Path of the scene model.
    pub fn model_path(&self) -> String {
        self.resolve(&[&self.models_root, &self.model_file])
    }

    /// Path of the optional section manifest.
    pub fn section_manifest_path(&self) -> String {
        self.resolve(&[&self.section_manifest])
    }

    /// Join the base path and segments with single separators.
    /// Asset paths are relative to the asset root, so no leading slash is kept.
    fn resolve(&self, segments: &[&str]) -> String {
        std::iter::once(self.base_path.as_str())
            .chain(segments.iter().copied())
            .map(|segment| segment.trim_matches('/'))
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }
}
