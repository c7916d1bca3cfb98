use material_units::config::EnrichmentConfig;
use material_units::enrichment::{Product, ScrapingResult, UnitEnrichmentPipeline};
use material_units::network::{FetchResult, NetworkError, PageFetcher};
use material_units::units::{ScraperParser, UnitCode};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

const KG_PAGE: &str = "<table><tr><td>Berat</td><td>25 KG</td></tr></table>";
const LITER_PAGE: &str = "<table><tr><td>Volume</td><td>5 Liter</td></tr></table>";
const PLAIN_PAGE: &str = "<html><body><p>Produk berkualitas</p></body></html>";

// * In-memory fetcher that records every URL it is asked for
#[derive(Default)]
struct RecordingFetcher {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    fn failing_on(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PageFetcher for RecordingFetcher {
    fn fetch_page(&self, url: &str, _timeout: Duration) -> FetchResult<String> {
        self.calls.lock().unwrap().push(url.to_string());

        if self.failing.contains(url) {
            return Box::pin(async { Err::<String, _>(NetworkError::HttpStatus(503)) });
        }

        let page = self.pages.get(url).cloned();
        Box::pin(async move { page.ok_or(NetworkError::HttpStatus(404)) })
    }
}

fn pipeline(
    fetcher: Arc<RecordingFetcher>,
    config: EnrichmentConfig,
) -> UnitEnrichmentPipeline<Arc<RecordingFetcher>> {
    UnitEnrichmentPipeline::new(fetcher, ScraperParser, config)
}

#[tokio::test]
async fn test_existing_unit_is_never_overwritten() {
    let fetcher = Arc::new(RecordingFetcher::default().with_page("https://shop.test/cat", LITER_PAGE));
    let pipeline = pipeline(fetcher.clone(), EnrichmentConfig::default());

    let input = ScrapingResult::succeeded(vec![Product::new("Cat Tembok", 150_000)
        .with_url("https://shop.test/cat")
        .with_unit(UnitCode::Kg)]);

    let output = pipeline.enrich(input).await;
    assert_eq!(output.products[0].unit, Some(UnitCode::Kg));
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_missing_url_skips_fetch() {
    let fetcher = Arc::new(RecordingFetcher::default());
    let pipeline = pipeline(fetcher.clone(), EnrichmentConfig::default());

    let input = ScrapingResult::succeeded(vec![Product::new("Semen Portland 50KG", 65_000)]);

    let (output, summary) = pipeline.enrich_with_summary(input).await;
    assert_eq!(output.products[0].unit, None);
    assert_eq!(summary.skipped, 1);
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_one_failure_does_not_abort_batch() {
    let fetcher = Arc::new(
        RecordingFetcher::default()
            .with_page("https://shop.test/a", KG_PAGE)
            .failing_on("https://shop.test/b")
            .with_page("https://shop.test/c", LITER_PAGE)
            .with_page("https://shop.test/d", PLAIN_PAGE),
    );
    let pipeline = pipeline(fetcher.clone(), EnrichmentConfig::default());

    let input = ScrapingResult::succeeded(vec![
        Product::new("A", 1).with_url("https://shop.test/a"),
        Product::new("B", 2).with_url("https://shop.test/b"),
        Product::new("C", 3).with_url("https://shop.test/c"),
        Product::new("D", 4).with_url("https://shop.test/d"),
    ]);

    let (output, summary) = pipeline.enrich_with_summary(input).await;

    let names: Vec<&str> = output.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C", "D"]);

    let units: Vec<Option<UnitCode>> = output.products.iter().map(|p| p.unit.clone()).collect();
    assert_eq!(
        units,
        vec![
            Some(UnitCode::Kg),
            None,
            Some(UnitCode::L),
            Some(UnitCode::Pcs)
        ]
    );

    assert_eq!(summary.from_detail, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(fetcher.calls().len(), 4);
}

#[tokio::test]
async fn test_failed_scrape_passes_through() {
    let fetcher = Arc::new(RecordingFetcher::default());
    let pipeline = pipeline(fetcher.clone(), EnrichmentConfig::default());

    let mut input = ScrapingResult::failed("vendor returned 500");
    input.products.push(Product::new("Paku", 5_000).with_url("https://shop.test/paku"));

    let output = pipeline.enrich(input.clone()).await;
    assert_eq!(output, input);
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_name_inference_avoids_fetch() {
    let fetcher = Arc::new(RecordingFetcher::default().with_page("https://shop.test/semen", LITER_PAGE));
    let config = EnrichmentConfig::default().with_name_inference(true);
    let pipeline = pipeline(fetcher.clone(), config);

    let input = ScrapingResult::succeeded(vec![
        Product::new("SEMEN PORTLAND 50KG", 65_000).with_url("https://shop.test/semen"),
        Product::new("random construction material", 1_000),
    ]);

    let (output, summary) = pipeline.enrich_with_summary(input).await;
    assert_eq!(output.products[0].unit, Some(UnitCode::Kg));
    assert_eq!(output.products[1].unit, None);
    assert_eq!(summary.from_name, 1);
    assert_eq!(summary.skipped, 1);
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_relative_urls_join_vendor_base() {
    let fetcher = Arc::new(
        RecordingFetcher::default().with_page("https://www.depobangunan.co.id/p/semen", KG_PAGE),
    );
    let base = Url::parse("https://www.depobangunan.co.id").unwrap();
    let pipeline = pipeline(fetcher.clone(), EnrichmentConfig::default().with_base_url(base));

    let input = ScrapingResult::succeeded(vec![Product::new("Semen", 65_000).with_url("/p/semen")]);

    let output = pipeline.enrich(input).await;
    assert_eq!(output.products[0].unit, Some(UnitCode::Kg));
    assert_eq!(fetcher.calls(), vec!["https://www.depobangunan.co.id/p/semen".to_string()]);
}

#[tokio::test]
async fn test_order_preserved_with_single_slot() {
    let fetcher = Arc::new(
        RecordingFetcher::default()
            .with_page("https://shop.test/1", LITER_PAGE)
            .with_page("https://shop.test/2", KG_PAGE),
    );
    let config = EnrichmentConfig::default().with_max_concurrent_fetches(1);
    let pipeline = pipeline(fetcher.clone(), config);

    let input = ScrapingResult::succeeded(vec![
        Product::new("Satu", 1).with_url("https://shop.test/1"),
        Product::new("Tanpa URL", 2),
        Product::new("Dua", 3).with_url("https://shop.test/2"),
    ]);

    let output = pipeline.enrich(input).await;
    assert_eq!(output.products[0].unit, Some(UnitCode::L));
    assert_eq!(output.products[1].unit, None);
    assert_eq!(output.products[2].unit, Some(UnitCode::Kg));
    assert_eq!(
        fetcher.calls(),
        vec!["https://shop.test/1".to_string(), "https://shop.test/2".to_string()]
    );
}

// * Serves each page after its own delay so fetches finish out of input order
struct DelayedFetcher {
    pages: HashMap<String, (Duration, &'static str)>,
}

impl PageFetcher for DelayedFetcher {
    fn fetch_page(&self, url: &str, _timeout: Duration) -> FetchResult<String> {
        let page = self.pages.get(url).copied();
        Box::pin(async move {
            let (delay, html) = page.ok_or(NetworkError::HttpStatus(404))?;
            tokio::time::sleep(delay).await;
            Ok::<String, NetworkError>(html.to_string())
        })
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_and_stalled_fetches_keep_order() {
    let pages = HashMap::from([
        ("https://shop.test/a".to_string(), (Duration::from_millis(300), KG_PAGE)),
        ("https://shop.test/b".to_string(), (Duration::from_secs(10), LITER_PAGE)),
        ("https://shop.test/c".to_string(), (Duration::from_millis(10), LITER_PAGE)),
    ]);
    let config = EnrichmentConfig::default().with_fetch_timeout(Duration::from_secs(1));
    let pipeline = UnitEnrichmentPipeline::new(DelayedFetcher { pages }, ScraperParser, config);

    let input = ScrapingResult::succeeded(vec![
        Product::new("a", 1).with_url("https://shop.test/a"),
        Product::new("b", 2).with_url("https://shop.test/b"),
        Product::new("c", 3).with_url("https://shop.test/c"),
    ]);

    let (output, summary) = pipeline.enrich_with_summary(input).await;

    let units: Vec<(&str, Option<UnitCode>)> = output
        .products
        .iter()
        .map(|p| (p.name.as_str(), p.unit.clone()))
        .collect();
    assert_eq!(
        units,
        vec![
            ("a", Some(UnitCode::Kg)),
            ("b", None),
            ("c", Some(UnitCode::L)),
        ]
    );
    assert_eq!(summary.from_detail, 2);
    assert_eq!(summary.failed, 1);
}
