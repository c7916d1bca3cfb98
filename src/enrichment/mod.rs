// * Enrichment: scraped products in, products with units out

pub mod pipeline;
pub mod product;

pub use pipeline::{EnrichmentSummary, UnitEnrichmentPipeline};
pub use product::{Product, ScrapingResult};
