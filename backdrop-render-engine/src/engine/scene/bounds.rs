use bevy::math::Affine3A;
use bevy::prelude::*;

/// Axis-aligned box accumulated from transformed mesh bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow to contain a local box `center ± half_extents` placed by `transform`.
    pub fn include_box(&mut self, center: Vec3, half_extents: Vec3, transform: &Affine3A) {
        for corner in 0..8 {
            let sign = Vec3::new(
                if corner & 1 == 0 { -1.0 } else { 1.0 },
                if corner & 2 == 0 { -1.0 } else { 1.0 },
                if corner & 4 == 0 { -1.0 } else { 1.0 },
            );
            self.include_point(transform.transform_point3(center + half_extents * sign));
        }
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }
}

/// Reference transform of a loaded model that the animation loop perturbs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelNormalization {
    /// Uniform scale bringing the largest axis to the target size.
    pub base_scale: f32,
    /// Bounds centre in model space; the pivot is offset by its negation.
    pub center: Vec3,
    /// Half of the normalised height, the unit of keyframe vertical shifts.
    pub half_height: f32,
}

impl ModelNormalization {
    /// A degenerate or empty model keeps unit scale.
    pub fn from_bounds(bounds: &Bounds, target_size: f32) -> Self {
        let size = bounds.size();
        let largest = size.max_element();
        let base_scale = if largest > 0.0 && largest.is_finite() {
            target_size / largest
        } else {
            1.0
        };

        Self {
            base_scale,
            center: bounds.center(),
            half_height: size.y / 2.0 * base_scale,
        }
    }

    /// Transform of the pivot child that moves the bounds centre to the rig origin.
    pub fn pivot_transform(&self) -> Transform {
        Transform::from_translation(-self.center)
    }
}
