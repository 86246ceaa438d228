use crate::shared::frame::Frame;
use crate::shared::BoxError;

use super::face_analysis::FaceAnalysis;

/// Domain interface for the landmark/age/gender detector.
///
/// Returns at most one face; `Ok(None)` means the image holds no face.
/// Implementations may keep model state, hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Option<FaceAnalysis>, BoxError>;
}
