use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::reflect::TypePath;
use constants::asset_paths::DEFAULT_SECTIONS;
use serde::{Deserialize, Serialize};

use crate::engine::core::error::BackdropError;
use crate::engine::core::settings::BackdropSettings;

/// One navigation section and its background image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub key: String,
    pub asset: String,
}

/// JSON document overriding the built-in section table.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct SectionManifest {
    pub sections: Vec<SectionEntry>,
}

/// Section lookup used by the host command surface and the native number keys.
/// Starts from the built-in table and is replaced wholesale once a manifest loads.
#[derive(Resource, Debug, Clone)]
pub struct SectionDirectory {
    entries: Vec<SectionEntry>,
    manifest: Option<Handle<SectionManifest>>,
}

impl Default for SectionDirectory {
    fn default() -> Self {
        Self {
            entries: DEFAULT_SECTIONS
                .iter()
                .map(|(key, asset)| SectionEntry {
                    key: key.to_string(),
                    asset: asset.to_string(),
                })
                .collect(),
            manifest: None,
        }
    }
}

impl SectionDirectory {
    /// Background image shown for a section key. Keys compare case-insensitively.
    pub fn resolve(&self, key: &str) -> Result<&str, BackdropError> {
        self.entries
            .iter()
            .find(|entry| entry.key.eq_ignore_ascii_case(key))
            .map(|entry| entry.asset.as_str())
            .ok_or_else(|| BackdropError::UnknownSection(key.to_string()))
    }

    /// Background image of the section at a page position.
    pub fn asset_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| entry.asset.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    fn replace(&mut self, manifest: &SectionManifest) {
        if manifest.sections.is_empty() {
            warn!("Section manifest is empty, keeping built-in sections");
            return;
        }
        self.entries = manifest.sections.clone();
    }
}

pub fn start_section_manifest_load(
    mut directory: ResMut<SectionDirectory>,
    settings: Res<BackdropSettings>,
    asset_server: Res<AssetServer>,
) {
    directory.manifest = Some(asset_server.load(settings.section_manifest_path()));
}

/// Swap in the manifest once it arrives. A missing manifest keeps the defaults.
pub fn apply_section_manifest(
    mut directory: ResMut<SectionDirectory>,
    manifests: Res<Assets<SectionManifest>>,
    asset_server: Res<AssetServer>,
) {
    let Some(handle) = directory.manifest.clone() else {
        return;
    };

    if let Some(manifest) = manifests.get(&handle) {
        directory.replace(manifest);
        directory.manifest = None;
        info!("✓ Section manifest loaded ({} sections)", directory.entries.len());
        return;
    }

    if let Some(LoadState::Failed(error)) = asset_server.get_load_state(&handle) {
        debug!("No section manifest ({}), using built-in sections", error);
        directory.manifest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_sections_cover_every_page() {
        let directory = SectionDirectory::default();
        assert_eq!(directory.resolve("donations").ok(), Some("3-min.jpg"));
        assert_eq!(directory.resolve("Events").ok(), Some("5-min.jpg"));
        assert_eq!(directory.asset_at(0), Some("1-min.jpg"));
        assert_eq!(directory.asset_at(5), None);
        assert_eq!(directory.keys().count(), DEFAULT_SECTIONS.len());
    }

    #[test]
    fn unknown_key_is_an_error() {
        let directory = SectionDirectory::default();
        assert!(matches!(
            directory.resolve("careers"),
            Err(BackdropError::UnknownSection(key)) if key == "careers"
        ));
    }

    #[test]
    fn manifest_replaces_table_unless_empty() {
        let mut directory = SectionDirectory::default();
        directory.replace(&SectionManifest { sections: vec![] });
        assert_eq!(directory.resolve("shop").ok(), Some("4-min.jpg"));

        let manifest: SectionManifest = serde_json::from_str(
            r#"{ "sections": [ { "key": "shop", "asset": "store.jpg" } ] }"#,
        )
        .unwrap();
        directory.replace(&manifest);
        assert_eq!(directory.resolve("shop").ok(), Some("store.jpg"));
        assert!(directory.resolve("mission").is_err());
    }
}
