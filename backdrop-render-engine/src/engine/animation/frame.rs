use bevy::prelude::*;
use constants::render_settings::CAMERA_POSITION;

use crate::engine::input::pointer::{PointerSignal, PointerTracker};
use crate::engine::input::scroll::ScrollTarget;
use crate::engine::scene::camera::BackdropCamera;

/// Everything the tick reads from outside the scene, captured once so every
/// system in the tick sees the same values.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FrameSignals {
    /// Seconds since the controller started.
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub delta: f32,
    pub scroll_target: f32,
    pub pointer: PointerSignal,
    pub camera_position: Vec3,
}

impl Default for FrameSignals {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            delta: 0.0,
            scroll_target: 0.0,
            pointer: PointerSignal::default(),
            camera_position: CAMERA_POSITION,
        }
    }
}

pub fn capture_frame_signals(
    time: Res<Time>,
    scroll: Res<ScrollTarget>,
    pointer: Option<Res<PointerTracker>>,
    cameras: Query<&GlobalTransform, With<BackdropCamera>>,
    mut signals: ResMut<FrameSignals>,
) {
    *signals = FrameSignals {
        elapsed: time.elapsed_secs(),
        delta: time.delta_secs(),
        scroll_target: scroll.get(),
        pointer: pointer.map(|tracker| tracker.signal()).unwrap_or_default(),
        camera_position: cameras
            .single()
            .map(GlobalTransform::translation)
            .unwrap_or(CAMERA_POSITION),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::pointer::PointerSample;

    #[test]
    fn snapshot_reflects_latest_inputs() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ScrollTarget>()
            .init_resource::<FrameSignals>()
            .insert_resource(PointerTracker::new(Vec2::new(800.0, 600.0), 0.0))
            .add_systems(Update, capture_frame_signals);

        app.world_mut().resource_mut::<ScrollTarget>().set(0.4);
        app.world_mut()
            .resource_mut::<PointerTracker>()
            .sample(PointerSample {
                position: Vec2::new(800.0, 300.0),
                viewport: Vec2::new(800.0, 600.0),
                time: 1.0,
            });
        app.update();

        let signals = *app.world().resource::<FrameSignals>();
        assert_eq!(signals.scroll_target, 0.4);
        assert!(signals.pointer.target_rotation.y > 0.0);
        assert_eq!(signals.camera_position, CAMERA_POSITION);
    }
}
