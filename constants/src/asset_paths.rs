/// Directory under the base path holding background images.
pub const IMAGES_ROOT: &str = "images";

/// Directory under the base path holding 3D models.
pub const MODELS_ROOT: &str = "models";

/// The single model the scene displays.
pub const MODEL_FILE: &str = "ohm4.glb";

/// Background shown before any transition is requested.
pub const INITIAL_BACKGROUND: &str = "1-min.jpg";

/// Optional JSON manifest mapping navigation sections to background images.
pub const SECTION_MANIFEST: &str = "backdrop/sections.json";

/// Navigation section keys and their background images, in page order.
pub const DEFAULT_SECTIONS: [(&str, &str); 5] = [
    ("mission", "1-min.jpg"),
    ("contact", "2-min.jpg"),
    ("donations", "3-min.jpg"),
    ("shop", "4-min.jpg"),
    ("events", "5-min.jpg"),
];
