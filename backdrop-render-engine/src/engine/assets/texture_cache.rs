use std::collections::HashMap;

use bevy::asset::LoadState;
use bevy::image::{ImageLoaderSettings, ImageSampler};
use bevy::prelude::*;

use crate::engine::core::settings::BackdropSettings;

/// Where a requested texture currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureLoadStatus {
    Pending,
    Loaded,
    Failed(String),
}

/// Issues texture loads by asset name and reports their progress.
pub trait TextureSource {
    fn load_texture(&mut self, asset: &str) -> Handle<Image>;
    fn load_status(&self, handle: &Handle<Image>) -> TextureLoadStatus;
}

/// Background images loaded through the asset server, addressed under the images root.
pub struct BackgroundImageSource<'a> {
    server: &'a AssetServer,
    settings: &'a BackdropSettings,
}

impl<'a> BackgroundImageSource<'a> {
    pub fn new(server: &'a AssetServer, settings: &'a BackdropSettings) -> Self {
        Self { server, settings }
    }
}

impl TextureSource for BackgroundImageSource<'_> {
    fn load_texture(&mut self, asset: &str) -> Handle<Image> {
        let path = self.settings.image_path(asset);
        debug!("Loading background image {}", path);
        // Linear filtering, no mipmaps.
        self.server
            .load_with_settings(path, |settings: &mut ImageLoaderSettings| {
                settings.sampler = ImageSampler::linear();
            })
    }

    fn load_status(&self, handle: &Handle<Image>) -> TextureLoadStatus {
        match self.server.get_load_state(handle) {
            Some(LoadState::Loaded) => TextureLoadStatus::Loaded,
            Some(LoadState::Failed(error)) => TextureLoadStatus::Failed(error.to_string()),
            _ => TextureLoadStatus::Pending,
        }
    }
}

/// Loaded textures by asset name. Entries live as long as the controller.
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: HashMap<String, Handle<Image>>,
}

impl TextureCache {
    pub fn get(&self, asset: &str) -> Option<&Handle<Image>> {
        self.entries.get(asset)
    }

    /// Record a loaded texture and return the cached handle. The first entry
    /// for a name wins; later loads of the same name resolve to it.
    pub fn insert(&mut self, asset: &str, handle: Handle<Image>) -> Handle<Image> {
        self.entries
            .entry(asset.to_string())
            .or_insert(handle)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
