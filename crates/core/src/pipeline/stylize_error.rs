use thiserror::Error;

use crate::sampling::domain::image_fetcher::FetchError;
use crate::shared::BoxError;

/// Request-fatal failures. Region sampling problems never appear here;
/// they degrade to the fallback color instead.
#[derive(Error, Debug)]
pub enum StylizeError {
    #[error("failed to fetch source image: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to decode source image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("face detection failed: {0}")]
    Detection(#[source] BoxError),
    #[error("No face detected")]
    NoFaceDetected,
    #[error("Generation failed: {0}")]
    Generation(#[source] BoxError),
}
