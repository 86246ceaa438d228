use std::fs;
use std::path::Path;

use crate::sampling::domain::image_fetcher::{FetchError, ImageFetcher};

/// Reads images from the local filesystem. Accepts plain paths and
/// `file://` URLs.
pub struct FileImageFetcher;

impl FileImageFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFetcher for FileImageFetcher {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        let path = Path::new(locator.strip_prefix("file://").unwrap_or(locator));
        fs::read(path).map_err(|e| FetchError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
