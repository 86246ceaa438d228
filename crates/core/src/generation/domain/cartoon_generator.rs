use crate::pipeline::stylization_params::StylizationParams;
use crate::shared::BoxError;

/// Domain interface for the external image-generation service.
///
/// Receives the source image locator as a visual reference plus the
/// derived parameters, and returns encoded image bytes. Prompt wording and
/// timeout policy belong to the implementation.
pub trait CartoonGenerator: Send {
    fn generate(&self, reference_url: &str, params: &StylizationParams)
        -> Result<Vec<u8>, BoxError>;
}
