pub mod config;
pub mod enrichment;
pub mod network;
pub mod ops;
pub mod units;

pub use enrichment::{EnrichmentSummary, Product, ScrapingResult, UnitEnrichmentPipeline};
pub use units::{DetailPageUnitResolver, UnitCode, UnitExtractor};
