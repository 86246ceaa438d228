/// Color reported for any region that could not be sampled.
pub const FALLBACK_COLOR: &str = "#d1bfa7";
pub const FALLBACK_RGB: [u8; 3] = [0xd1, 0xbf, 0xa7];

/// Smallest side length a clamped sampling region is grown to, image bounds permitting.
pub const MIN_SAMPLE_SIDE: i64 = 10;

/// Nose offset from the eye midpoint (pixels) beyond which the head counts as turned.
pub const HEAD_TURN_THRESHOLD_PX: f64 = 10.0;

/// Mouth opening / mouth width ratio above which the face counts as smiling.
pub const SMILE_RATIO_THRESHOLD: f64 = 0.2;

pub const DEFAULT_MAX_REDIRECTS: usize = 5;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_GENERATOR_URL: &str = "https://image.pollinations.ai/prompt/";
