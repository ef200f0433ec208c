use bevy::prelude::*;
use constants::materials::{
    GLASS_DRAW_ORDER, GLASS_IOR, GLASS_ROUGHNESS, GLASS_THICKNESS, GLASS_TRANSMISSION,
    LITE_GLASS_OPACITY, LITE_GLASS_ROUGHNESS,
};

use crate::engine::core::capability::FidelityTier;

/// Replacement for any mesh whose material name contains the glass tag.
pub fn glass_material(tier: FidelityTier) -> StandardMaterial {
    match tier {
        FidelityTier::Full => StandardMaterial {
            base_color: Color::WHITE,
            perceptual_roughness: GLASS_ROUGHNESS,
            metallic: 0.0,
            specular_transmission: GLASS_TRANSMISSION,
            ior: GLASS_IOR,
            thickness: GLASS_THICKNESS,
            depth_bias: GLASS_DRAW_ORDER,
            ..default()
        },
        FidelityTier::Reduced => StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, LITE_GLASS_OPACITY),
            perceptual_roughness: LITE_GLASS_ROUGHNESS,
            metallic: 0.0,
            alpha_mode: AlphaMode::Blend,
            depth_bias: GLASS_DRAW_ORDER,
            ..default()
        },
    }
}
