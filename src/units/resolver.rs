// * Detail page unit resolver.
// * Looks for a unit in specification tables first, then next to "ukuran"/"size" labels.
// * Always answers with a concrete unit: anything it cannot resolve becomes PCS.

use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use crate::units::code::UnitCode;
use crate::units::dom::{DomTree, HtmlParser, ScraperParser};
use crate::units::extractor::UnitExtractor;

static LABEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ukuran|size").expect("Invalid label pattern"));

// * Table keys that announce a size/weight/capacity value
const SPEC_KEYWORDS: &[&str] = &[
    "ukuran",
    "size",
    "dimensi",
    "berat",
    "weight",
    "kapasitas",
    "volume",
];

/// Configuration for [`DetailPageUnitResolver`]
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Lowercase substrings that mark a table row as a specification row
    pub spec_keywords: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            spec_keywords: SPEC_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl ResolverConfig {
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.spec_keywords.push(keyword.into().to_lowercase());
        self
    }
}

/// Resolves a product's unit from its detail page HTML
pub struct DetailPageUnitResolver<P: HtmlParser = ScraperParser> {
    extractor: Arc<UnitExtractor>,
    parser: P,
    config: ResolverConfig,
}

impl DetailPageUnitResolver<ScraperParser> {
    /// Creates a resolver using the `scraper` HTML parser
    pub fn new(extractor: Arc<UnitExtractor>) -> Self {
        Self::with_parser(extractor, ScraperParser)
    }
}

impl<P: HtmlParser> DetailPageUnitResolver<P> {
    pub fn with_parser(extractor: Arc<UnitExtractor>, parser: P) -> Self {
        Self::with_config(extractor, parser, ResolverConfig::default())
    }

    pub fn with_config(extractor: Arc<UnitExtractor>, parser: P, config: ResolverConfig) -> Self {
        Self {
            extractor,
            parser,
            config,
        }
    }

    pub fn extractor(&self) -> &Arc<UnitExtractor> {
        &self.extractor
    }

    /// Name-based unit with the PCS fallback applied (no match or the "X" placeholder)
    pub fn parse_unit_from_product_name<'a>(&self, name: impl Into<Option<&'a str>>) -> UnitCode {
        match self.extractor.extract_from_name(name) {
            Some(unit) if !unit.is_placeholder() => unit,
            _ => UnitCode::Pcs,
        }
    }

    /// Resolves a unit from detail page HTML. Never fails; PCS is the fallback.
    pub fn resolve_from_detail_page<'a>(&self, html: impl Into<Option<&'a str>>) -> UnitCode {
        let html = match html.into() {
            Some(html) if !html.trim().is_empty() => html,
            _ => return UnitCode::Pcs,
        };

        let tree = match self.parser.parse(html) {
            Ok(tree) => tree,
            Err(e) => {
                warn!(error = %e, "Error parsing unit from detail page");
                return UnitCode::Pcs;
            }
        };

        self.resolve_tree(&tree).unwrap_or(UnitCode::Pcs)
    }

    fn resolve_tree<T: DomTree>(&self, tree: &T) -> Option<UnitCode> {
        if let Some(unit) = self.from_tables(tree) {
            debug!(unit = %unit, "Unit resolved from specification table");
            return Some(unit);
        }

        if let Some(unit) = self.near_labels(tree) {
            debug!(unit = %unit, "Unit resolved near size label");
            return Some(unit);
        }

        None
    }

    // * First two cells of a row are (key, value); extra cells are ignored
    fn from_tables<T: DomTree>(&self, tree: &T) -> Option<UnitCode> {
        for table in tree.tables() {
            for row in tree.rows(table) {
                let cells = tree.row_cells(row);
                if cells.len() < 2 {
                    continue;
                }

                let key = tree.text_of(cells[0]).to_lowercase();
                if !self.is_spec_key(&key) {
                    continue;
                }

                if let Some(unit) = self.accept(&tree.text_of(cells[1])) {
                    return Some(unit);
                }
            }
        }
        None
    }

    fn near_labels<T: DomTree>(&self, tree: &T) -> Option<UnitCode> {
        let labels = tree.label_elements().into_iter().filter(|&el| {
            tree.own_string(el)
                .is_some_and(|text| LABEL_PATTERN.is_match(&text))
        });

        for label in labels {
            for text in tree.sibling_texts(label) {
                if let Some(unit) = self.accept(&text) {
                    return Some(unit);
                }
            }

            if let Some(parent) = tree.parent(label) {
                if let Some(unit) = self.accept(&tree.text_of(parent)) {
                    return Some(unit);
                }
            }
        }
        None
    }

    fn is_spec_key(&self, key: &str) -> bool {
        self.config
            .spec_keywords
            .iter()
            .any(|keyword| key.contains(keyword.as_str()))
    }

    // * "X" comes from size columns like "60 x 60"; keep looking past it
    fn accept(&self, text: &str) -> Option<UnitCode> {
        self.extractor
            .extract_from_specification(text)
            .filter(|unit| !unit.is_placeholder())
    }
}
