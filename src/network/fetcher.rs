use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::network::errors::NetworkError;

pub type FetchResult<T> = Pin<Box<dyn Future<Output = Result<T, NetworkError>> + Send>>;

/// Trait for retrieving raw detail page HTML
pub trait PageFetcher: Send + Sync {
    /// Fetches the page body, giving up after `timeout`
    fn fetch_page(&self, url: &str, timeout: Duration) -> FetchResult<String>;
}

// * Shared fetchers (tests keep a handle to inspect recorded calls)
impl<F: PageFetcher + ?Sized> PageFetcher for Arc<F> {
    fn fetch_page(&self, url: &str, timeout: Duration) -> FetchResult<String> {
        (**self).fetch_page(url, timeout)
    }
}
