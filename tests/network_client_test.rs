use material_units::config::settings::EnrichmentConfig;
use material_units::network::client::PageClient;
use material_units::network::fetcher::PageFetcher;
use material_units::network::NetworkError;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_client_initialization() {
    let client = PageClient::new(&EnrichmentConfig::default());
    assert!(client.is_ok());
}

#[tokio::test]
async fn test_connection_failures_are_retried_with_delay() {
    let config = EnrichmentConfig::default().with_retries(2, Duration::from_millis(50));
    let client = PageClient::new(&config).unwrap();

    let started = Instant::now();
    let result = client
        .fetch_page("http://127.0.0.1:9/detail", Duration::from_secs(2))
        .await;

    assert!(matches!(result, Err(NetworkError::Request(_))));
    // * Two retries, each preceded by the configured pause
    assert!(started.elapsed() >= Duration::from_millis(100));
}
