use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use thiserror::Error;

use crate::generation::domain::cartoon_generator::CartoonGenerator;
use crate::generation::domain::prompt::build_prompt;
use crate::pipeline::stylization_params::StylizationParams;
use crate::shared::BoxError;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("invalid generator URL {0}")]
    InvalidBaseUrl(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("generation request failed: {0}")]
    Request(#[source] reqwest::Error),
}

/// Renders through the Pollinations image endpoint.
///
/// The prompt becomes the last path segment and the reference image is
/// passed as the `input` query parameter, both percent-encoded.
pub struct PollinationsGenerator {
    client: Client,
    base_url: Url,
}

impl PollinationsGenerator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GeneratorError> {
        let base_url =
            Url::parse(base_url).map_err(|_| GeneratorError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GeneratorError::InvalidBaseUrl(base_url.to_string()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GeneratorError::Client)?;
        Ok(Self { client, base_url })
    }

    pub fn request_url(&self, prompt: &str, reference_url: &str) -> Result<Url, GeneratorError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GeneratorError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(prompt);
        url.query_pairs_mut().append_pair("input", reference_url);
        Ok(url)
    }
}

impl CartoonGenerator for PollinationsGenerator {
    fn generate(
        &self,
        reference_url: &str,
        params: &StylizationParams,
    ) -> Result<Vec<u8>, BoxError> {
        let prompt = build_prompt(params);
        log::debug!("Generation prompt: {prompt}");
        let url = self.request_url(&prompt, reference_url)?;

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(GeneratorError::Request)?;
        let bytes = response.bytes().map_err(GeneratorError::Request)?;
        log::info!("Generator returned {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
