use material_units::config::EnrichmentConfig;
use material_units::enrichment::{ScrapingResult, UnitEnrichmentPipeline};
use material_units::network::{NetworkError, PageClient};
use material_units::ops::telemetry;
use material_units::units::{ScraperParser, Strategy, UnitCode, UnitExtractor};
use serde::Serialize;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

#[derive(Serialize)]
struct NameExtraction<'a> {
    name: &'a str,
    unit: Option<UnitCode>,
    strategy: Option<Strategy>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // * Logs go to stderr as JSON; stdout carries the result document
    telemetry::init_tracing();

    let names_mode = std::env::args().skip(1).any(|arg| arg == "--names");

    match run(names_mode).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "material-units failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(names_mode: bool) -> Result<(), CliError> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let document = if names_mode {
        let extractor = UnitExtractor::new();
        let extracted: Vec<NameExtraction<'_>> = input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|name| {
                let found = extractor.extract_with_strategy(name);
                NameExtraction {
                    name,
                    unit: found.as_ref().map(|(unit, _)| unit.clone()),
                    strategy: found.map(|(_, strategy)| strategy),
                }
            })
            .collect();
        serde_json::to_string_pretty(&extracted)?
    } else {
        let result: ScrapingResult = serde_json::from_str(&input)?;
        let config = EnrichmentConfig::from_env();
        let client = PageClient::new(&config)?;
        let pipeline = UnitEnrichmentPipeline::new(client, ScraperParser, config);

        let enriched = pipeline.enrich(result).await;
        serde_json::to_string_pretty(&enriched)?
    };

    let mut out = io::stdout().lock();
    writeln!(out, "{document}")?;
    Ok(())
}
