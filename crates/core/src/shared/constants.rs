/// Face service endpoint used when no settings override it.
pub const DEFAULT_DETECTOR_URL: &str = "http://face-service:8001/detect-face";

pub const DEFAULT_DETECTOR_TIMEOUT_SECS: u64 = 30;

/// Landmark count of the 468-point face-mesh topology the named regions assume.
pub const FACE_MESH_LANDMARK_COUNT: usize = 468;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Shown to customers next to every simulated after-image.
pub const SIMULATION_DISCLAIMER: &str =
    "This visualization is a digital simulation. Results may vary.";

/// Service shown to customers when no rule fires for a detected face.
pub const FALLBACK_SERVICE: &str = "Fruit Facial";

pub const SETTINGS_DIR_NAME: &str = "skinconsult";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
