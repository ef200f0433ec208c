use constants::keyframes::{ModelKeyframe, SCROLL_SMOOTHING};

/// Cubic ease `3t² - 2t³`, with `t` clamped to `[0, 1]`.
pub fn ease(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Model pose at scroll fraction `t`. The eased fraction is spread over the
/// keyframe gaps and each field is interpolated linearly within its gap.
pub fn sample_keyframes(keyframes: &[ModelKeyframe], t: f32) -> ModelKeyframe {
    let Some(first) = keyframes.first() else {
        return ModelKeyframe::new(1.0, 0.0, 0.0, 0.0);
    };
    let last_index = keyframes.len() - 1;
    if last_index == 0 {
        return *first;
    }

    let scaled = ease(t) * last_index as f32;
    let index = (scaled.floor() as usize).min(last_index);
    let next = (index + 1).min(last_index);
    let blend = (scaled - index as f32).clamp(0.0, 1.0);

    let from = keyframes[index];
    let to = keyframes[next];
    ModelKeyframe {
        zoom: lerp(from.zoom, to.zoom, blend),
        y_shift: lerp(from.y_shift, to.y_shift, blend),
        rot_x: lerp(from.rot_x, to.rot_x, blend),
        rot_y: lerp(from.rot_y, to.rot_y, blend),
    }
}

/// Smoothed scroll progress chasing the raw target, owned by the frame loop.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub progress: f32,
    pub target: f32,
}

impl ScrollState {
    pub fn advance(&mut self, target: f32) -> f32 {
        self.target = target.clamp(0.0, 1.0);
        self.progress += (self.target - self.progress) * SCROLL_SMOOTHING;
        self.progress
    }
}
