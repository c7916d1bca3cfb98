// * Unit enrichment pipeline
// * Fills missing product units from the name, then from the product's detail page.
// * Strictly best-effort: a failing product keeps its missing unit and the batch moves on.

use futures::stream::{self, StreamExt};
use governor::{Quota, RateLimiter as GovernorLimiter};
use nonzero_ext::nonzero;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::settings::EnrichmentConfig;
use crate::enrichment::product::{Product, ScrapingResult};
use crate::network::errors::NetworkError;
use crate::network::fetcher::PageFetcher;
use crate::network::normalization::resolve_product_url;
use crate::ops::telemetry;
use crate::units::dom::{HtmlParser, ScraperParser};
use crate::units::extractor::UnitExtractor;
use crate::units::resolver::DetailPageUnitResolver;

type DirectLimiter = GovernorLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Per-batch counts of what happened to each product
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentSummary {
    /// Already carried a unit
    pub untouched: usize,
    /// Unit inferred from the product name
    pub from_name: usize,
    /// Unit resolved from the detail page
    pub from_detail: usize,
    /// Detail page could not be fetched; unit left missing
    pub failed: usize,
    /// No unit and no URL to look at
    pub skipped: usize,
}

impl EnrichmentSummary {
    pub fn total(&self) -> usize {
        self.untouched + self.from_name + self.from_detail + self.failed + self.skipped
    }

    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Untouched => self.untouched += 1,
            Outcome::FromName => self.from_name += 1,
            Outcome::FromDetail => self.from_detail += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Untouched,
    FromName,
    FromDetail,
    Failed,
    Skipped,
}

/// Enriches scraped products with units
pub struct UnitEnrichmentPipeline<F: PageFetcher, P: HtmlParser = ScraperParser> {
    fetcher: F,
    resolver: DetailPageUnitResolver<P>,
    config: EnrichmentConfig,
    limiter: DirectLimiter,
}

impl<F: PageFetcher, P: HtmlParser> UnitEnrichmentPipeline<F, P> {
    /// Creates a pipeline with its own extractor
    pub fn new(fetcher: F, parser: P, config: EnrichmentConfig) -> Self {
        Self::with_extractor(fetcher, parser, config, Arc::new(UnitExtractor::new()))
    }

    /// Creates a pipeline sharing an existing extractor
    pub fn with_extractor(
        fetcher: F,
        parser: P,
        config: EnrichmentConfig,
        extractor: Arc<UnitExtractor>,
    ) -> Self {
        if let Err(e) = extractor.warm_up() {
            warn!(error = %e, "Unit pattern failed to compile, its strategy will be skipped");
        }

        let quota = Quota::per_minute(
            NonZeroU32::new(config.requests_per_minute).unwrap_or(nonzero!(1u32)),
        );

        Self {
            fetcher,
            resolver: DetailPageUnitResolver::with_parser(extractor, parser),
            config,
            limiter: GovernorLimiter::direct(quota),
        }
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    pub fn resolver(&self) -> &DetailPageUnitResolver<P> {
        &self.resolver
    }

    /// Enriches every product missing a unit. Failed results pass through unchanged.
    pub async fn enrich(&self, result: ScrapingResult) -> ScrapingResult {
        self.enrich_with_summary(result).await.0
    }

    /// Like [`enrich`](Self::enrich), also reporting what happened per product
    pub async fn enrich_with_summary(
        &self,
        mut result: ScrapingResult,
    ) -> (ScrapingResult, EnrichmentSummary) {
        let mut summary = EnrichmentSummary::default();

        if !result.success {
            debug!(error = ?result.error_message, "Skipping enrichment of failed scrape");
            return (result, summary);
        }

        let products = std::mem::take(&mut result.products);

        // * buffered (not buffer_unordered): output order must equal input order
        let enriched: Vec<(Product, Outcome)> = stream::iter(products)
            .map(|product| self.enrich_product(product))
            .buffered(self.config.effective_concurrency())
            .collect()
            .await;

        result.products = enriched
            .into_iter()
            .map(|(product, outcome)| {
                summary.record(&outcome);
                product
            })
            .collect();

        info!(
            products = summary.total(),
            untouched = summary.untouched,
            from_name = summary.from_name,
            from_detail = summary.from_detail,
            failed = summary.failed,
            skipped = summary.skipped,
            "Unit enrichment complete"
        );

        (result, summary)
    }

    async fn enrich_product(&self, mut product: Product) -> (Product, Outcome) {
        // ! Never overwrite a unit the scraper already found
        if product.unit.is_some() {
            return (product, Outcome::Untouched);
        }

        if self.config.infer_from_name {
            if let Some(unit) = self.resolver.extractor().extract_from_name(product.name.as_str()) {
                product.unit = Some(unit);
                return (product, Outcome::FromName);
            }
        }

        let raw_url = match product.detail_url() {
            Some(url) => url.to_string(),
            None => return (product, Outcome::Skipped),
        };

        match self.fetch_detail(&raw_url).await {
            Ok(html) => {
                let unit = self.resolver.resolve_from_detail_page(html.as_str());
                telemetry::record_detail_fetch("success");
                debug!(url = %raw_url, unit = %unit, "Unit resolved from detail page");
                product.unit = Some(unit);
                (product, Outcome::FromDetail)
            }
            Err(e) => {
                warn!(product = %product.name, url = %raw_url, error = %e, "Error fetching detail page");
                telemetry::record_detail_fetch(e.outcome());
                (product, Outcome::Failed)
            }
        }
    }

    async fn fetch_detail(&self, raw_url: &str) -> Result<String, NetworkError> {
        let url = resolve_product_url(raw_url, self.config.base_url.as_ref())?;
        let timeout = self.config.fetch_timeout;

        self.limiter.until_ready().await;

        match tokio::time::timeout(timeout, self.fetcher.fetch_page(url.as_str(), timeout)).await {
            Ok(fetched) => fetched,
            Err(_) => Err(NetworkError::Timeout(timeout)),
        }
    }
}
