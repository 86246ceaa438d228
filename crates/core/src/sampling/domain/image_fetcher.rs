use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported image locator: {0}")]
    InvalidLocator(String),
    #[error("fetch of {0} was cancelled")]
    Cancelled(String),
}

/// Retrieves the raw encoded bytes behind an image locator (URL or path).
///
/// Shared across sampling threads, hence `Send + Sync` and `&self`.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError>;
}
