use bevy::prelude::*;

use crate::engine::assets::texture_cache::{TextureCache, TextureLoadStatus, TextureSource};
use crate::engine::background::crossfade::{CrossfadeState, FadeStep};
use crate::engine::core::capability::FidelityTier;
use crate::engine::core::error::BackdropError;
use crate::engine::core::lifecycle::CancellationToken;

/// Why a texture is being loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadPurpose {
    /// First background; creates the quad when it arrives.
    Initial,
    /// Requested transition; applied to the existing quad.
    Transition,
}

#[derive(Debug)]
struct PendingLoad {
    asset: String,
    handle: Handle<Image>,
    purpose: LoadPurpose,
    token: CancellationToken,
}

/// Change the scene must make to the background quad.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundUpdate {
    /// Create the quad showing `texture` as both current and next.
    Spawn { asset: String, texture: Handle<Image> },
    /// Set `texture` as the blend target with the blend factor at 0.
    BeginCrossfade { texture: Handle<Image> },
    /// Show `texture` immediately with no blend.
    Swap { texture: Handle<Image> },
    /// Advance the blend factor.
    Blend(f32),
    /// Blend finished: next is now current and the blend factor is 0.
    Promote { texture: Handle<Image> },
    /// A load failed; the background stays as it was.
    Failed { error: BackdropError, initial: bool },
}

/// Result of a transition request.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// Texture was cached and applied right away.
    Applied(BackgroundUpdate),
    /// A load was issued; the transition applies when it completes.
    Loading,
    /// Coalescing is on and the same asset is already loading.
    Joined,
    /// Asset is already showing and no fade is in flight.
    AlreadyCurrent,
    /// No background quad exists yet.
    NoBackground,
}

/// Background texture state: cache, outstanding loads, the crossfade and which
/// assets occupy the current and next slots.
#[derive(Resource, Debug)]
pub struct BackgroundController {
    tier: FidelityTier,
    coalesce_in_flight_loads: bool,
    cache: TextureCache,
    pending: Vec<PendingLoad>,
    crossfade: CrossfadeState,
    current: Option<(String, Handle<Image>)>,
    next: Option<(String, Handle<Image>)>,
}

impl BackgroundController {
    pub fn new(tier: FidelityTier, coalesce_in_flight_loads: bool) -> Self {
        Self {
            tier,
            coalesce_in_flight_loads,
            cache: TextureCache::default(),
            pending: Vec::new(),
            crossfade: CrossfadeState::default(),
            current: None,
            next: None,
        }
    }

    pub fn has_background(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_asset(&self) -> Option<&str> {
        self.current.as_ref().map(|(asset, _)| asset.as_str())
    }

    pub fn crossfade(&self) -> &CrossfadeState {
        &self.crossfade
    }

    pub fn cache(&self) -> &TextureCache {
        &self.cache
    }

    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    /// Issue the load of the first background.
    pub fn begin_initial(
        &mut self,
        asset: &str,
        source: &mut impl TextureSource,
        token: CancellationToken,
    ) {
        let handle = source.load_texture(asset);
        self.pending.push(PendingLoad {
            asset: asset.to_string(),
            handle,
            purpose: LoadPurpose::Initial,
            token,
        });
    }

    /// Move the background to `asset`. Cached textures apply at once; anything else
    /// is loaded and applied when the load completes. Repeated requests for an
    /// uncached asset each issue their own load unless coalescing is enabled.
    pub fn request_transition(
        &mut self,
        asset: &str,
        source: &mut impl TextureSource,
        token: CancellationToken,
    ) -> TransitionOutcome {
        if !self.has_background() {
            return TransitionOutcome::NoBackground;
        }

        if !self.crossfade.is_fading() && self.current_asset() == Some(asset) {
            return TransitionOutcome::AlreadyCurrent;
        }

        if let Some(texture) = self.cache.get(asset).cloned() {
            return TransitionOutcome::Applied(self.apply(asset, texture));
        }

        if self.coalesce_in_flight_loads
            && self
                .pending
                .iter()
                .any(|load| load.asset == asset && load.purpose == LoadPurpose::Transition)
        {
            return TransitionOutcome::Joined;
        }

        let handle = source.load_texture(asset);
        self.pending.push(PendingLoad {
            asset: asset.to_string(),
            handle,
            purpose: LoadPurpose::Transition,
            token,
        });
        TransitionOutcome::Loading
    }

    /// Collect finished loads. Completions whose token was cancelled are dropped
    /// without touching any state.
    pub fn poll_loads(&mut self, source: &impl TextureSource) -> Vec<BackgroundUpdate> {
        let mut updates = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for load in std::mem::take(&mut self.pending) {
            if load.token.is_cancelled() {
                continue;
            }

            match source.load_status(&load.handle) {
                TextureLoadStatus::Pending => still_pending.push(load),
                TextureLoadStatus::Loaded => {
                    let texture = self.cache.insert(&load.asset, load.handle);
                    match load.purpose {
                        LoadPurpose::Initial => {
                            self.current = Some((load.asset.clone(), texture.clone()));
                            self.next = None;
                            updates.push(BackgroundUpdate::Spawn {
                                asset: load.asset,
                                texture,
                            });
                        }
                        // The quad may never have appeared if the first image failed.
                        LoadPurpose::Transition if self.has_background() => {
                            updates.push(self.apply(&load.asset, texture));
                        }
                        LoadPurpose::Transition => {}
                    }
                }
                TextureLoadStatus::Failed(reason) => {
                    updates.push(BackgroundUpdate::Failed {
                        error: BackdropError::TextureLoad {
                            asset: load.asset,
                            reason,
                        },
                        initial: load.purpose == LoadPurpose::Initial,
                    });
                }
            }
        }

        self.pending = still_pending;
        updates
    }

    /// Step the crossfade. Returns the change to push to the background material.
    pub fn advance(&mut self, delta_seconds: f32) -> Option<BackgroundUpdate> {
        match self.crossfade.advance(delta_seconds) {
            FadeStep::Idle => None,
            FadeStep::Blending(mix) => Some(BackgroundUpdate::Blend(mix)),
            FadeStep::Completed => {
                let promoted = self.next.take()?;
                let texture = promoted.1.clone();
                self.current = Some(promoted);
                Some(BackgroundUpdate::Promote { texture })
            }
        }
    }

    /// Drop every cached texture and outstanding load.
    pub fn release(&mut self) {
        self.cache.clear();
        self.pending.clear();
        self.current = None;
        self.next = None;
        self.crossfade = CrossfadeState::default();
    }

    fn apply(&mut self, asset: &str, texture: Handle<Image>) -> BackgroundUpdate {
        match self.tier {
            FidelityTier::Full => {
                self.next = Some((asset.to_string(), texture.clone()));
                self.crossfade.begin();
                BackgroundUpdate::BeginCrossfade { texture }
            }
            FidelityTier::Reduced => {
                self.current = Some((asset.to_string(), texture.clone()));
                BackgroundUpdate::Swap { texture }
            }
        }
    }
}
