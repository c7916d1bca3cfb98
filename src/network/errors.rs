use std::time::Duration;
use thiserror::Error;

// * Unified Error type for the Network Layer.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0} from detail page")]
    HttpStatus(u16),

    #[error("Empty response body (< {0} bytes)")]
    EmptyResponse(usize),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),
}

impl NetworkError {
    // * Only connection faults are worth another attempt.
    // * A timed-out attempt has already spent the whole per-product budget.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::Request(e) => e.is_connect() && !e.is_timeout(),
            _ => false,
        }
    }

    /// Short label used for the fetch outcome metric
    pub fn outcome(&self) -> &'static str {
        match self {
            NetworkError::Timeout(_) => "timeout",
            NetworkError::InvalidUrl(_) => "invalid_url",
            NetworkError::HttpStatus(_) => "http_status",
            NetworkError::EmptyResponse(_) => "empty_body",
            NetworkError::Request(_) => "failure",
        }
    }
}
