use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::sampling::domain::image_fetcher::{FetchError, ImageFetcher};

/// Decorator that downloads each locator once and replays the bytes.
///
/// Meant to live for a single request so the detection pass and the three
/// region samples share one download. Failures are not cached. The lock is
/// held across the inner fetch so concurrent callers wait instead of
/// downloading the same image in parallel.
pub struct MemoizedImageFetcher {
    inner: Arc<dyn ImageFetcher>,
    cache: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoizedImageFetcher {
    pub fn new(inner: Arc<dyn ImageFetcher>) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

impl ImageFetcher for MemoizedImageFetcher {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(bytes) = cache.get(locator) {
            return Ok(bytes.clone());
        }
        let bytes = self.inner.fetch(locator)?;
        cache.insert(locator.to_string(), bytes.clone());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFetcher {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingFetcher {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl ImageFetcher for CountingFetcher {
        fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(FetchError::InvalidLocator(locator.to_string()))
            } else {
                Ok(locator.as_bytes().to_vec())
            }
        }
    }

    #[test]
    fn test_repeated_fetch_hits_inner_once() {
        let inner = Arc::new(CountingFetcher::new(false));
        let fetcher = MemoizedImageFetcher::new(inner.clone());
        assert_eq!(fetcher.fetch("a").unwrap(), b"a");
        assert_eq!(fetcher.fetch("a").unwrap(), b"a");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_distinct_locators_cached_separately() {
        let inner = Arc::new(CountingFetcher::new(false));
        let fetcher = MemoizedImageFetcher::new(inner.clone());
        assert_eq!(fetcher.fetch("a").unwrap(), b"a");
        assert_eq!(fetcher.fetch("b").unwrap(), b"b");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failures_are_retried() {
        let inner = Arc::new(CountingFetcher::new(true));
        let fetcher = MemoizedImageFetcher::new(inner.clone());
        assert!(fetcher.fetch("a").is_err());
        assert!(fetcher.fetch("a").is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_callers_share_one_download() {
        let inner = Arc::new(CountingFetcher::new(false));
        let fetcher = MemoizedImageFetcher::new(inner.clone());
        std::thread::scope(|scope| {
            for _ in 0..3 {
                scope.spawn(|| fetcher.fetch("img").unwrap());
            }
        });
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }
}
