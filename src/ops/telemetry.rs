// * Telemetry - JSON Logging and Prometheus Metrics
// * Structured logging setup plus counters for extraction and enrichment

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec, Encoder, TextEncoder};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

lazy_static! {
    // * Units extracted from names, by winning strategy
    pub static ref EXTRACTIONS_TOTAL: CounterVec = register_counter_vec!(
        "material_units_extractions_total",
        "Units extracted from product names by strategy",
        &["strategy"]
    ).expect("! CRITICAL: Failed to register extractions counter");

    // * Detail page fetch outcomes
    pub static ref DETAIL_FETCHES_TOTAL: CounterVec = register_counter_vec!(
        "material_units_detail_fetches_total",
        "Detail page fetches by outcome",
        &["outcome"]
    ).expect("! CRITICAL: Failed to register detail fetch counter");

    // * Patterns that failed to compile or match, by strategy
    pub static ref PATTERN_FAULTS_TOTAL: CounterVec = register_counter_vec!(
        "material_units_pattern_faults_total",
        "Unit pattern faults by strategy",
        &["strategy"]
    ).expect("! CRITICAL: Failed to register pattern fault counter");
}

/// Initializes the tracing subscriber with JSON formatting
///
/// # Example
/// ```ignore
/// use material_units::ops::telemetry;
///
/// telemetry::init_tracing();
/// tracing::info!(products = 12, "Enriching batch");
/// ```
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Initializes JSON tracing with a default level used when `RUST_LOG` is unset
pub fn init_tracing_with_level(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // * try_init: a second call (tests, embedding apps) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .try_init();
}

/// Initializes tracing with pretty formatting (for development)
pub fn init_tracing_pretty() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .try_init();
}

/// Returns the current metrics in Prometheus text format
pub fn get_metrics_string() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Records a unit extracted from a product name
pub fn record_unit_extraction(strategy: &str) {
    EXTRACTIONS_TOTAL.with_label_values(&[strategy]).inc();
}

/// Records a pattern fault inside an extraction strategy
pub fn record_pattern_fault(strategy: &str) {
    PATTERN_FAULTS_TOTAL.with_label_values(&[strategy]).inc();
}

/// Records a detail page fetch outcome ("success", "failure", "timeout", "invalid_url")
pub fn record_detail_fetch(outcome: &str) {
    DETAIL_FETCHES_TOTAL.with_label_values(&[outcome]).inc();
}
