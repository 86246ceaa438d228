use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;

use crate::sampling::domain::image_fetcher::{FetchError, ImageFetcher};

/// Downloads images over HTTP(S) with a bounded redirect chain and a
/// whole-request timeout. Non-2xx responses count as failures.
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration, max_redirects: usize) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(max_redirects))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        let http_err = |e| FetchError::Http {
            url: locator.to_string(),
            source: e,
        };
        let response = self
            .client
            .get(locator)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http_err)?;
        let bytes = response.bytes().map_err(http_err)?;
        log::debug!("Fetched {} bytes from {locator}", bytes.len());
        Ok(bytes.to_vec())
    }
}
