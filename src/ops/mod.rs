// * Operations: structured logging and Prometheus counters

pub mod telemetry;

pub use telemetry::{
    get_metrics_string, init_tracing, init_tracing_pretty, init_tracing_with_level,
    record_detail_fetch, record_pattern_fault, record_unit_extraction,
};
