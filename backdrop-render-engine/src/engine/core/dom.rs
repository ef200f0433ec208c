use bevy::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use constants::render_settings::CANVAS_SELECTOR;

type DomCallback = Closure<dyn FnMut(web_sys::Event)>;

/// Window event listeners installed by the engine. Kept alive here rather than
/// leaked so teardown can unsubscribe them.
#[derive(Default)]
pub struct DomListeners {
    listeners: Vec<(&'static str, DomCallback)>,
}

impl DomListeners {
    /// Subscribe `handler` to a window event.
    pub fn listen(&mut self, event: &'static str, handler: impl FnMut(web_sys::Event) + 'static) {
        let closure: DomCallback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);

        let Some(window) = web_sys::window() else {
            warn!("No window available, '{}' listener not installed", event);
            return;
        };

        if let Err(e) =
            window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            warn!("Failed to register '{}' listener: {:?}", event, e);
            return;
        }

        self.listeners.push((event, closure));
    }

    /// Unsubscribe and drop every listener.
    pub fn remove_all(&mut self) {
        let Some(window) = web_sys::window() else {
            self.listeners.clear();
            return;
        };

        for (event, closure) in self.listeners.drain(..) {
            if let Err(e) =
                window.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            {
                warn!("Failed to remove '{}' listener: {:?}", event, e);
            }
        }
    }
}

/// Detach the render canvas from the page.
pub fn remove_canvas() {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };

    match document.query_selector(CANVAS_SELECTOR) {
        Ok(Some(canvas)) => {
            canvas.remove();
            info!("Removed render canvas {}", CANVAS_SELECTOR);
        }
        Ok(None) => debug!("Render canvas {} already gone", CANVAS_SELECTOR),
        Err(e) => warn!("Canvas lookup failed: {:?}", e),
    }
}

/// Current value of the page's monotonic clock, in seconds.
pub fn performance_now_seconds() -> Option<f64> {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now() / 1000.0)
}
