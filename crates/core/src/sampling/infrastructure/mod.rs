pub mod file_image_fetcher;
pub mod http_image_fetcher;
pub mod locator_image_fetcher;
pub mod memoized_image_fetcher;
