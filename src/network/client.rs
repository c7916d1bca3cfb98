use crate::config::constants::MIN_BODY_BYTES;
use crate::config::settings::EnrichmentConfig;
use crate::network::errors::NetworkError;
use crate::network::fetcher::{FetchResult, PageFetcher};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

// * The HTTP engine for vendor detail pages.
#[derive(Debug, Clone)]
pub struct PageClient {
    inner: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl PageClient {
    // * Initializes the client with the configured browser identity.
    pub fn new(config: &EnrichmentConfig) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .gzip(true)
            .brotli(true)
            .cookie_store(true)
            .timeout(config.fetch_timeout)
            .build()?;

        Ok(Self {
            inner: client,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        })
    }

    // * Fetches a URL, retrying connection-level failures with a fixed delay.
    pub async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, NetworkError> {
        fetch_with_retries(
            self.inner.clone(),
            url.to_string(),
            timeout,
            self.max_retries,
            self.retry_delay,
        )
        .await
    }
}

async fn fetch_with_retries(
    client: Client,
    url: String,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
) -> Result<String, NetworkError> {
    let mut attempt = 0;
    loop {
        match fetch_once(&client, &url, timeout).await {
            Ok(body) => return Ok(body),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                attempt += 1;
                warn!(url = %url, attempt, error = %e, "Detail page fetch failed, retrying");
                tokio::time::sleep(retry_delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn fetch_once(client: &Client, url: &str, timeout: Duration) -> Result<String, NetworkError> {
    let resp = client.get(url).timeout(timeout).send().await?;
    let status = resp.status();

    if !status.is_success() {
        return Err(NetworkError::HttpStatus(status.as_u16()));
    }

    let body = resp.text().await?;

    if body.trim().len() < MIN_BODY_BYTES {
        return Err(NetworkError::EmptyResponse(MIN_BODY_BYTES));
    }

    debug!(url = %url, bytes = body.len(), "Fetched detail page");
    Ok(body)
}

impl PageFetcher for PageClient {
    fn fetch_page(&self, url: &str, timeout: Duration) -> FetchResult<String> {
        Box::pin(fetch_with_retries(
            self.inner.clone(),
            url.to_string(),
            timeout,
            self.max_retries,
            self.retry_delay,
        ))
    }
}
