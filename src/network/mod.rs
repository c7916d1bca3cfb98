// * Network Layer
// * Detail page fetching behind the `PageFetcher` seam, plus product URL resolution.

pub mod client;
pub mod errors;
pub mod fetcher;
pub mod normalization;

pub use client::PageClient;
pub use errors::NetworkError;
pub use fetcher::{FetchResult, PageFetcher};
pub use normalization::resolve_product_url;
