use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::lighting::INITIAL_AMBIENT_INTENSITY;
use constants::pointer::{
    MAX_LIGHT_INTENSITY, MAX_POINTER_ANGLE, MIN_LIGHT_INTENSITY, MIN_SAMPLE_INTERVAL,
    SPEED_CEILING,
};

/// Orientation and light targets derived from pointer motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSignal {
    /// Target pitch (x) and yaw (y) in radians, within ±60° each.
    pub target_rotation: Vec2,
    /// Light intensity in `[0.4, 2.5]`.
    pub light_intensity: f32,
    /// Normalised pointer speed in `[0, 1]`.
    pub light_speed: f32,
}

impl Default for PointerSignal {
    fn default() -> Self {
        Self {
            target_rotation: Vec2::ZERO,
            light_intensity: INITIAL_AMBIENT_INTENSITY,
            light_speed: 0.0,
        }
    }
}

/// Map a speed in logical pixels per second to `(intensity, normalised speed)`.
pub fn light_from_speed(speed: f32) -> (f32, f32) {
    let normalized = (speed / SPEED_CEILING).clamp(0.0, 1.0);
    let intensity = MIN_LIGHT_INTENSITY + (MAX_LIGHT_INTENSITY - MIN_LIGHT_INTENSITY) * normalized;
    (intensity, normalized)
}

/// Orientation for a pointer position: the viewport centre maps to zero,
/// moving down tilts forward and moving right turns right.
pub fn rotation_for_position(position: Vec2, viewport: Vec2) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }
    let normalized = position / viewport - Vec2::splat(0.5);
    Vec2::new(-normalized.y, normalized.x).clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
        * MAX_POINTER_ANGLE
}

/// One pointer-move observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub position: Vec2,
    pub viewport: Vec2,
    /// Wall-clock timestamp in seconds.
    pub time: f64,
}

/// Sole writer of the [`PointerSignal`]. The signal holds its last value when the
/// pointer stops; nothing decays it.
#[derive(Resource, Debug, Clone)]
pub struct PointerTracker {
    last_position: Vec2,
    last_time: f64,
    signal: PointerSignal,
}

impl PointerTracker {
    /// Tracker that assumes the pointer starts at the viewport centre.
    pub fn new(viewport: Vec2, now: f64) -> Self {
        Self {
            last_position: viewport / 2.0,
            last_time: now,
            signal: PointerSignal::default(),
        }
    }

    pub fn signal(&self) -> PointerSignal {
        self.signal
    }

    pub fn sample(&mut self, sample: PointerSample) {
        let elapsed = ((sample.time - self.last_time).max(MIN_SAMPLE_INTERVAL)) as f32;
        let speed = sample.position.distance(self.last_position) / elapsed;

        self.last_position = sample.position;
        self.last_time = sample.time;

        let (light_intensity, light_speed) = light_from_speed(speed);
        self.signal = PointerSignal {
            target_rotation: rotation_for_position(sample.position, sample.viewport),
            light_intensity,
            light_speed,
        };
    }
}

fn primary_viewport(window: &Window) -> Vec2 {
    Vec2::new(window.width(), window.height())
}

pub fn setup_pointer_tracker(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time<Real>>,
) {
    let viewport = windows
        .single()
        .map(primary_viewport)
        .unwrap_or(Vec2::ZERO);
    commands.insert_resource(PointerTracker::new(viewport, pointer_clock(&time)));
}

#[cfg(target_arch = "wasm32")]
fn pointer_clock(time: &Time<Real>) -> f64 {
    crate::engine::core::dom::performance_now_seconds()
        .unwrap_or_else(|| time.elapsed_secs_f64())
}

#[cfg(not(target_arch = "wasm32"))]
fn pointer_clock(time: &Time<Real>) -> f64 {
    time.elapsed_secs_f64()
}

/// Feed the last cursor position of the frame into the tracker.
#[cfg(not(target_arch = "wasm32"))]
pub fn track_cursor(
    mut cursor_events: EventReader<CursorMoved>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time<Real>>,
    mut tracker: ResMut<PointerTracker>,
) {
    let Some(position) = cursor_events.read().last().map(|event| event.position) else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };

    tracker.sample(PointerSample {
        position,
        viewport: primary_viewport(window),
        time: time.elapsed_secs_f64(),
    });
}

/// Pointer samples captured by the page's `pointermove` listener.
#[cfg(target_arch = "wasm32")]
#[derive(Resource, Clone, Default)]
pub struct PointerSampleQueue(std::sync::Arc<std::sync::Mutex<Vec<PointerSample>>>);

/// Listen to `pointermove` on the window so motion over page content still counts.
#[cfg(target_arch = "wasm32")]
pub fn setup_pointer_listener(
    mut commands: Commands,
    mut listeners: NonSendMut<crate::engine::core::dom::DomListeners>,
) {
    use wasm_bindgen::JsCast;

    let queue = PointerSampleQueue::default();
    let writer = queue.0.clone();

    listeners.listen("pointermove", move |event: web_sys::Event| {
        let Some(event) = event.dyn_ref::<web_sys::MouseEvent>() else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };

        let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
        };
        let sample = PointerSample {
            position: Vec2::new(event.client_x() as f32, event.client_y() as f32),
            viewport: Vec2::new(
                dimension(window.inner_width()),
                dimension(window.inner_height()),
            ),
            time: crate::engine::core::dom::performance_now_seconds().unwrap_or(0.0),
        };

        if let Ok(mut samples) = writer.lock() {
            samples.push(sample);
        }
    });

    commands.insert_resource(queue);
}

#[cfg(target_arch = "wasm32")]
pub fn drain_pointer_samples(
    queue: Option<Res<PointerSampleQueue>>,
    mut tracker: ResMut<PointerTracker>,
) {
    let Some(queue) = queue else {
        return;
    };

    let samples = if let Ok(mut samples) = queue.0.lock() {
        std::mem::take(&mut *samples)
    } else {
        Vec::new()
    };

    for sample in samples {
        tracker.sample(sample);
    }
}
