use bevy::prelude::*;
use serde::Serialize;

use crate::engine::core::error::BackdropError;

/// User agent fragments that mark a phone or tablet class device.
const MOBILE_AGENT_MARKERS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

const APPLE_TOUCH_MARKERS: [&str; 3] = ["ipad", "iphone", "ipod"];

/// Device capability classification. Chosen once at startup and threaded through
/// every material and background decision so both always agree.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FidelityTier {
    /// Constrained device: single-sample swirl, no background compositing shader,
    /// simple translucent glass.
    Reduced,
    /// Full multi-sample swirl, noise-masked background crossfade and transmissive glass.
    Full,
}

impl FidelityTier {
    pub fn is_reduced(self) -> bool {
        matches!(self, FidelityTier::Reduced)
    }
}

/// Environment signals the tier is derived from.
#[derive(Debug, Clone, Default)]
pub struct DeviceProfile {
    pub user_agent: String,
    /// `ontouchstart` present on the window.
    pub touch_start: bool,
    /// `ontouchend` present on the document.
    pub touch_end: bool,
}

impl DeviceProfile {
    /// Apple touch devices, including iPads that report a desktop Mac agent.
    fn is_apple_touch(&self, agent: &str) -> bool {
        APPLE_TOUCH_MARKERS.iter().any(|marker| agent.contains(marker))
            || (self.user_agent.contains("Mac") && self.touch_end)
    }

    fn is_mobile(&self, agent: &str) -> bool {
        MOBILE_AGENT_MARKERS.iter().any(|marker| agent.contains(marker))
            || (self.touch_start && self.user_agent.contains("Mobile"))
    }

    pub fn classify(&self) -> FidelityTier {
        let agent = self.user_agent.to_lowercase();
        if self.is_mobile(&agent) || self.is_apple_touch(&agent) {
            FidelityTier::Reduced
        } else {
            FidelityTier::Full
        }
    }
}

/// Read the device profile from the browser.
#[cfg(target_arch = "wasm32")]
pub fn detect_device_profile() -> DeviceProfile {
    use wasm_bindgen::JsValue;

    let Some(window) = web_sys::window() else {
        return DeviceProfile::default();
    };

    let user_agent = window.navigator().user_agent().unwrap_or_default();
    let touch_start = js_sys::Reflect::has(&window, &JsValue::from_str("ontouchstart"))
        .unwrap_or(false);
    let touch_end = window
        .document()
        .and_then(|document| {
            js_sys::Reflect::has(&document, &JsValue::from_str("ontouchend")).ok()
        })
        .unwrap_or(false);

    DeviceProfile {
        user_agent,
        touch_start,
        touch_end,
    }
}

/// Desktop builds always run the full tier.
#[cfg(not(target_arch = "wasm32"))]
pub fn detect_device_profile() -> DeviceProfile {
    DeviceProfile::default()
}

/// Check that a GPU context can be created before any scene state exists.
#[cfg(target_arch = "wasm32")]
pub fn check_rendering_context() -> Result<(), BackdropError> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| BackdropError::ContextUnavailable("no document".to_string()))?;

    let canvas = document
        .create_element("canvas")
        .map_err(|_| BackdropError::ContextUnavailable("cannot create canvas".to_string()))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| BackdropError::ContextUnavailable("element is not a canvas".to_string()))?;

    match canvas.get_context("webgl2") {
        Ok(Some(_)) => Ok(()),
        _ => Err(BackdropError::ContextUnavailable(
            "WebGL2 is not supported".to_string(),
        )),
    }
}

/// Native adapters are selected by the renderer itself.
#[cfg(not(target_arch = "wasm32"))]
pub fn check_rendering_context() -> Result<(), BackdropError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(agent: &str) -> DeviceProfile {
        DeviceProfile {
            user_agent: agent.to_string(),
            ..default()
        }
    }

    #[test]
    fn desktop_browsers_get_full_tier() {
        let chrome = profile(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/126.0 Safari/537.36",
        );
        assert_eq!(chrome.classify(), FidelityTier::Full);
        assert_eq!(DeviceProfile::default().classify(), FidelityTier::Full);
    }

    #[test]
    fn phones_get_reduced_tier() {
        let android = profile("Mozilla/5.0 (Linux; Android 14; Pixel 8) Mobile Safari/537.36");
        let iphone = profile("Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X)");
        assert_eq!(android.classify(), FidelityTier::Reduced);
        assert_eq!(iphone.classify(), FidelityTier::Reduced);
    }

    #[test]
    fn desktop_class_ipad_is_detected_by_touch() {
        let mut ipad = profile("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) Safari/605.1.15");
        assert_eq!(ipad.classify(), FidelityTier::Full);
        ipad.touch_end = true;
        assert_eq!(ipad.classify(), FidelityTier::Reduced);
    }

    #[test]
    fn touch_without_mobile_marker_stays_full() {
        let laptop = DeviceProfile {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0".to_string(),
            touch_start: true,
            touch_end: false,
        };
        assert_eq!(laptop.classify(), FidelityTier::Full);
    }
}
