// * Runtime settings for the enrichment pipeline and its HTTP client.
// * Defaults come from `constants`; every field can be overridden from the environment.

use std::str::FromStr;
use std::time::Duration;
use tracing::warn;
use url::Url;

use crate::config::constants::{
    DEFAULT_USER_AGENT, FETCH_TIMEOUT_SECS, MAX_CONCURRENT_FETCHES, MAX_RETRIES,
    REQUESTS_PER_MINUTE, RETRY_DELAY_MS,
};

pub const ENV_FETCH_TIMEOUT_SECS: &str = "UNITS_FETCH_TIMEOUT_SECS";
pub const ENV_MAX_CONCURRENT_FETCHES: &str = "UNITS_MAX_CONCURRENT_FETCHES";
pub const ENV_REQUESTS_PER_MINUTE: &str = "UNITS_REQUESTS_PER_MINUTE";
pub const ENV_MAX_RETRIES: &str = "UNITS_MAX_RETRIES";
pub const ENV_RETRY_DELAY_MS: &str = "UNITS_RETRY_DELAY_MS";
pub const ENV_USER_AGENT: &str = "UNITS_USER_AGENT";
pub const ENV_BASE_URL: &str = "UNITS_BASE_URL";
pub const ENV_INFER_FROM_NAME: &str = "UNITS_INFER_FROM_NAME";

/// Configuration for detail-page enrichment
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Upper bound for a single detail page fetch
    pub fetch_timeout: Duration,
    /// Detail pages in flight at once
    pub max_concurrent_fetches: usize,
    /// Rate limit shared by all fetches of one pipeline
    pub requests_per_minute: u32,
    /// Retries after connection-level failures
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub user_agent: String,
    /// Vendor origin that relative product URLs are joined against
    pub base_url: Option<Url>,
    /// Try the product name before fetching the detail page (off by default)
    pub infer_from_name: bool,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            max_concurrent_fetches: MAX_CONCURRENT_FETCHES,
            requests_per_minute: REQUESTS_PER_MINUTE,
            max_retries: MAX_RETRIES,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: None,
            infer_from_name: false,
        }
    }
}

impl EnrichmentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a config from `UNITS_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    /// Unparseable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_FETCH_TIMEOUT_SECS) {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = parse_var::<usize, _>(&lookup, ENV_MAX_CONCURRENT_FETCHES) {
            config.max_concurrent_fetches = n;
        }
        if let Some(rpm) = parse_var::<u32, _>(&lookup, ENV_REQUESTS_PER_MINUTE) {
            config.requests_per_minute = rpm;
        }
        if let Some(retries) = parse_var::<u32, _>(&lookup, ENV_MAX_RETRIES) {
            config.max_retries = retries;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, ENV_RETRY_DELAY_MS) {
            config.retry_delay = Duration::from_millis(ms);
        }
        if let Some(agent) = lookup(ENV_USER_AGENT).filter(|v| !v.trim().is_empty()) {
            config.user_agent = agent;
        }
        if let Some(base) = parse_var::<Url, _>(&lookup, ENV_BASE_URL) {
            config.base_url = Some(base);
        }
        if let Some(raw) = lookup(ENV_INFER_FROM_NAME) {
            match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.infer_from_name = true,
                "0" | "false" | "no" | "off" => config.infer_from_name = false,
                _ => warn!(key = ENV_INFER_FROM_NAME, value = %raw, "Ignoring invalid boolean"),
            }
        }

        config
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_max_concurrent_fetches(mut self, n: usize) -> Self {
        self.max_concurrent_fetches = n;
        self
    }

    pub fn with_requests_per_minute(mut self, rpm: u32) -> Self {
        self.requests_per_minute = rpm;
        self
    }

    pub fn with_retries(mut self, max_retries: u32, delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = delay;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_name_inference(mut self, enabled: bool) -> Self {
        self.infer_from_name = enabled;
        self
    }

    // * Zero would stall `buffered`; clamp to one
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrent_fetches.max(1)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key = key, value = %raw, error = %e, "Ignoring invalid environment value");
            None
        }
    }
}
