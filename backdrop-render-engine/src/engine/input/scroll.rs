use bevy::prelude::*;

/// Scroll fraction one line of wheel movement advances.
#[cfg(not(target_arch = "wasm32"))]
const WHEEL_LINE_STEP: f32 = 0.05;

/// Pixels of wheel movement that span the whole scroll range.
#[cfg(not(target_arch = "wasm32"))]
const WHEEL_PIXEL_SPAN: f32 = 2000.0;

/// Raw scroll position in `[0, 1]`, written by the host (or the wheel on native)
/// and read once per tick by the frame loop.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct ScrollTarget(f32);

impl ScrollTarget {
    pub fn get(&self) -> f32 {
        self.0
    }

    /// Non-finite input leaves the target unchanged.
    pub fn set(&mut self, progress: f32) {
        if progress.is_finite() {
            self.0 = progress.clamp(0.0, 1.0);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn scroll_with_mouse_wheel(
    mut wheel_events: EventReader<bevy::input::mouse::MouseWheel>,
    mut target: ResMut<ScrollTarget>,
) {
    use bevy::input::mouse::MouseScrollUnit;

    let delta: f32 = wheel_events
        .read()
        .map(|event| match event.unit {
            MouseScrollUnit::Line => -event.y * WHEEL_LINE_STEP,
            MouseScrollUnit::Pixel => -event.y / WHEEL_PIXEL_SPAN,
        })
        .sum();

    if delta != 0.0 {
        let next = target.get() + delta;
        target.set(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_is_clamped() {
        let mut target = ScrollTarget::default();
        target.set(1.4);
        assert_eq!(target.get(), 1.0);
        target.set(-0.2);
        assert_eq!(target.get(), 0.0);
        target.set(0.35);
        assert_eq!(target.get(), 0.35);
        target.set(f32::NAN);
        assert_eq!(target.get(), 0.35);
    }
}
