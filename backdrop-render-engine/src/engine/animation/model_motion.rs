use bevy::prelude::*;
use constants::keyframes::{MODEL_KEYFRAMES, POINTER_ROTATION_STRENGTH, ROTATION_SMOOTHING};

use crate::engine::animation::frame::FrameSignals;
use crate::engine::animation::keyframes::{ScrollState, sample_keyframes};
use crate::engine::scene::bounds::ModelNormalization;

/// Root of the loaded model. Its transform is rewritten every tick from the
/// normalisation reference; the centring offset lives on the pivot child.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ModelRig {
    pub normalization: ModelNormalization,
}

/// Smoothed motion state of the model rig.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct ModelMotion {
    pub scroll: ScrollState,
    /// Current pitch (x) and yaw (y), chasing keyframe plus pointer orientation.
    pub rotation: Vec2,
}

impl ModelMotion {
    /// Advance one tick and return the rig transform.
    pub fn step(
        &mut self,
        normalization: &ModelNormalization,
        scroll_target: f32,
        pointer_rotation: Vec2,
    ) -> Transform {
        let progress = self.scroll.advance(scroll_target);
        let pose = sample_keyframes(&MODEL_KEYFRAMES, progress);

        let target_rotation =
            Vec2::new(pose.rot_x, pose.rot_y) + pointer_rotation * POINTER_ROTATION_STRENGTH;
        self.rotation += (target_rotation - self.rotation) * ROTATION_SMOOTHING;

        Transform {
            translation: Vec3::new(0.0, normalization.half_height * pose.y_shift, 0.0),
            rotation: Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0),
            scale: Vec3::splat(normalization.base_scale * pose.zoom),
        }
    }
}

pub fn update_model_motion(
    signals: Res<FrameSignals>,
    mut rigs: Query<(&ModelRig, &mut ModelMotion, &mut Transform)>,
) {
    for (rig, mut motion, mut transform) in &mut rigs {
        *transform = motion.step(
            &rig.normalization,
            signals.scroll_target,
            signals.pointer.target_rotation,
        );
    }
}
