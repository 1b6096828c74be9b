/// Overlap percentage a pair must strictly exceed to count as corresponding.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 50.0;

pub const ANNOTATION_EXTENSION: &str = "xml";

/// Extension appended to an image identifier to locate the source image.
pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

pub const CONFIG_DIR_NAME: &str = "annodiff";
pub const CONFIG_FILE_NAME: &str = "config.json";
