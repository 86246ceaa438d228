use crate::sampling::domain::image_fetcher::{FetchError, ImageFetcher};

use super::file_image_fetcher::FileImageFetcher;
use super::http_image_fetcher::HttpImageFetcher;

/// Routes `http(s)://` locators to the network and everything else to disk.
pub struct LocatorImageFetcher {
    http: HttpImageFetcher,
    file: FileImageFetcher,
}

impl LocatorImageFetcher {
    pub fn new(http: HttpImageFetcher, file: FileImageFetcher) -> Self {
        Self { http, file }
    }
}

pub fn is_remote(locator: &str) -> bool {
    let lower = locator.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl ImageFetcher for LocatorImageFetcher {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        if locator.trim().is_empty() {
            return Err(FetchError::InvalidLocator(locator.to_string()));
        }
        if is_remote(locator) {
            self.http.fetch(locator)
        } else {
            self.file.fetch(locator)
        }
    }
}
