// * Unit extraction engine.
// * Turns a product name or a specification value into at most one normalized unit.
// * Every input is length-bounded before matching and all patterns run on the
// * linear-time `regex` engine, so attacker-controlled names cannot blow up matching cost.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::config::constants::{MAX_NAME_CHARS, MAX_SPEC_CHARS, MAX_SPEC_TOKEN_CHARS};
use crate::ops::telemetry;
use crate::units::code::{UnitCode, PASS_THROUGH_MAX_CHARS};
use crate::units::error::UnitError;
use crate::units::registry::UnitPatternRegistry;

// * Bounded decimal token: up to 10 digits with an optional `.`/`,` fraction
const NUMBER: &str = r"\d{1,10}(?:[.,]\d{1,10})?";

// * Substrings marking accessories/tools that are sold per piece
const PCS_INDICATORS: &[&str] = &[
    "sponge",
    "brush",
    "kuas",
    "spons",
    "sikat",
    "saklar",
    "stop kontak",
    "outlet",
    "plug",
    "socket",
    "handle",
    "pegangan",
    "knob",
    "kenop",
    "button",
    "tombol",
];

/// The strategy that produced a unit, tried in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// `60x60cm` style dimensions
    Area,
    /// Number glued to a unit (`25kg`) or followed by an inch/feet marker
    Adjacent,
    /// Standalone synonym, first code in priority order wins
    Priority,
    /// Accessory/tool keyword defaulting to PCS
    CategoryDefault,
}

impl Strategy {
    pub const CHAIN: [Strategy; 4] = [
        Strategy::Area,
        Strategy::Adjacent,
        Strategy::Priority,
        Strategy::CategoryDefault,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Area => "area",
            Strategy::Adjacent => "adjacent",
            Strategy::Priority => "priority",
            Strategy::CategoryDefault => "category_default",
        }
    }
}

/// A regex compiled on first use and published once
#[derive(Debug)]
struct CachedPattern {
    source: String,
    compiled: OnceLock<Result<Regex, UnitError>>,
}

impl CachedPattern {
    fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compiled: OnceLock::new(),
        }
    }

    // * Two threads racing here compile identical patterns; OnceLock keeps the first
    fn get(&self) -> Result<&Regex, UnitError> {
        self.compiled
            .get_or_init(|| {
                Regex::new(&self.source).map_err(|e| UnitError::pattern(&self.source, &e))
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

/// Pattern-matching engine for unit inference
#[derive(Debug)]
pub struct UnitExtractor {
    area: CachedPattern,
    inch: CachedPattern,
    feet: CachedPattern,
    adjacent: CachedPattern,
    spec_token: CachedPattern,
    // * One combined pattern per code, in priority order
    priority: Vec<(UnitCode, CachedPattern)>,
}

impl UnitExtractor {
    /// Creates an extractor over the built-in registry
    pub fn new() -> Self {
        Self::with_registry(UnitPatternRegistry::new())
    }

    /// Creates an extractor over a specific registry
    pub fn with_registry(registry: UnitPatternRegistry) -> Self {
        let priority = registry
            .priority_order()
            .iter()
            .map(|code| {
                let source = Self::standalone_pattern(registry.synonyms_for(code));
                (code.clone(), CachedPattern::new(source))
            })
            .collect();

        Self {
            area: CachedPattern::new(format!(
                r"(?i)({NUMBER})\s?[x×]\s?({NUMBER})\s?(cm|mm|m)(?:\s|$)"
            )),
            inch: CachedPattern::new(format!(r#"(?i){NUMBER}\s*(?:["″]|inchi|inch)"#)),
            feet: CachedPattern::new(format!(r"(?i){NUMBER}\s*(?:['′]|feet|ft)")),
            adjacent: CachedPattern::new(format!(
                r"(?i)({NUMBER})(kg|gram|gr|g|ml|lt|l|cc|pcs|set|mm|cm|m)(?:\s|$)"
            )),
            spec_token: CachedPattern::new(r"[A-Za-z²³]+"),
            priority,
        }
    }

    // * Synonyms must stand alone: start/whitespace/bracket/digit before, end/whitespace/bracket after
    fn standalone_pattern(synonyms: &[&str]) -> String {
        let alternatives: Vec<String> = synonyms.iter().map(|s| regex::escape(s)).collect();
        format!(
            r"(?i)(?:^|[\s(\[{{]|\d)(?:{})(?:[\s)\]}}]|$)",
            alternatives.join("|")
        )
    }

    /// Compiles every pattern up front, reporting the first one that fails
    pub fn warm_up(&self) -> Result<(), UnitError> {
        let fixed = [
            &self.area,
            &self.inch,
            &self.feet,
            &self.adjacent,
            &self.spec_token,
        ];
        let mut first_fault = None;
        for pattern in fixed
            .into_iter()
            .chain(self.priority.iter().map(|(_, pattern)| pattern))
        {
            if let Err(e) = pattern.get() {
                first_fault.get_or_insert(e);
            }
        }

        match first_fault {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Infers a unit from a product name.
    ///
    /// Absent, empty or whitespace-only input yields `None`. Names longer than
    /// 1000 characters are truncated first, so units that only appear in the
    /// tail are missed.
    pub fn extract_from_name<'a>(&self, text: impl Into<Option<&'a str>>) -> Option<UnitCode> {
        self.extract_with_strategy(text).map(|(unit, _)| unit)
    }

    /// Like [`extract_from_name`](Self::extract_from_name) but also reports which strategy matched
    pub fn extract_with_strategy<'a>(
        &self,
        text: impl Into<Option<&'a str>>,
    ) -> Option<(UnitCode, Strategy)> {
        let text = prepare(text.into(), MAX_NAME_CHARS, "Product name")?;

        for strategy in Strategy::CHAIN {
            match self.apply(strategy, &text) {
                Ok(Some(unit)) => {
                    debug!(strategy = strategy.as_str(), unit = %unit, "Unit extracted from name");
                    telemetry::record_unit_extraction(strategy.as_str());
                    return Some((unit, strategy));
                }
                Ok(None) => {}
                Err(e) => {
                    // ! A broken pattern only disables its own strategy
                    warn!(
                        strategy = strategy.as_str(),
                        text = %text,
                        error = %e,
                        "Error extracting unit, skipping strategy"
                    );
                    telemetry::record_pattern_fault(strategy.as_str());
                }
            }
        }

        None
    }

    fn apply(&self, strategy: Strategy, text: &str) -> Result<Option<UnitCode>, UnitError> {
        match strategy {
            Strategy::Area => self.extract_area(text),
            Strategy::Adjacent => self.extract_adjacent(text),
            Strategy::Priority => Ok(self.extract_by_priority(text)),
            Strategy::CategoryDefault => Ok(Self::category_default(text)),
        }
    }

    fn extract_area(&self, text: &str) -> Result<Option<UnitCode>, UnitError> {
        let unit = self
            .area
            .get()?
            .captures(text)
            .and_then(|caps| caps.get(3))
            .and_then(|m| match m.as_str().to_lowercase().as_str() {
                "cm" => Some(UnitCode::Cm2),
                "mm" => Some(UnitCode::Mm2),
                "m" => Some(UnitCode::M2),
                _ => None,
            });
        Ok(unit)
    }

    // * Inch/feet first: their quote symbols are not letters, so the generic
    // * adjacent pattern would never see them
    fn extract_adjacent(&self, text: &str) -> Result<Option<UnitCode>, UnitError> {
        if self.inch.get()?.is_match(text) {
            return Ok(Some(UnitCode::Inch));
        }

        if self.feet.get()?.is_match(text) {
            return Ok(Some(UnitCode::Feet));
        }

        let unit = self
            .adjacent
            .get()?
            .captures(text)
            .and_then(|caps| caps.get(2))
            .and_then(|m| match m.as_str().to_lowercase().as_str() {
                "kg" => Some(UnitCode::Kg),
                "gram" | "gr" | "g" => Some(UnitCode::G),
                "ml" => Some(UnitCode::Ml),
                "lt" | "l" => Some(UnitCode::L),
                "cc" => Some(UnitCode::Cc),
                "pcs" => Some(UnitCode::Pcs),
                "set" => Some(UnitCode::Set),
                "mm" => Some(UnitCode::Mm),
                "cm" => Some(UnitCode::Cm),
                "m" => Some(UnitCode::M),
                _ => None,
            });
        Ok(unit)
    }

    fn extract_by_priority(&self, text: &str) -> Option<UnitCode> {
        for (code, pattern) in &self.priority {
            match pattern.get() {
                Ok(regex) if regex.is_match(text) => return Some(code.clone()),
                Ok(_) => {}
                Err(e) => {
                    warn!(unit = %code, error = %e, "Priority pattern unavailable, skipping code");
                    telemetry::record_pattern_fault(Strategy::Priority.as_str());
                }
            }
        }
        None
    }

    fn category_default(text: &str) -> Option<UnitCode> {
        PCS_INDICATORS
            .iter()
            .any(|indicator| text.contains(indicator))
            .then_some(UnitCode::Pcs)
    }

    /// Infers a unit from a short specification value such as `"1KG"` or `"2.5 L"`.
    ///
    /// The trailing run of letters (plus `²`/`³`) is mapped through the synonym
    /// table. Tokens missing from the table pass through when they are at most
    /// four characters long, which also admits junk abbreviations.
    pub fn extract_from_specification<'a>(
        &self,
        text: impl Into<Option<&'a str>>,
    ) -> Option<UnitCode> {
        let text = prepare(text.into(), MAX_SPEC_CHARS, "Specification text")?;

        let regex = match self.spec_token.get() {
            Ok(regex) => regex,
            Err(e) => {
                warn!(text = %text, error = %e, "Error extracting unit from specification");
                return None;
            }
        };

        let token = regex.find_iter(&text).last()?.as_str().to_uppercase();
        if token.chars().count() > MAX_SPEC_TOKEN_CHARS {
            return None;
        }

        match map_spec_token(&token) {
            Some(unit) => Some(unit),
            None if token.chars().count() <= PASS_THROUGH_MAX_CHARS => Some(UnitCode::Other(token)),
            None => None,
        }
    }
}

impl Default for UnitExtractor {
    fn default() -> Self {
        Self::new()
    }
}

// * Validates, bounds and lowercases caller text. Truncation happens before any matching.
fn prepare(text: Option<&str>, max_chars: usize, label: &str) -> Option<String> {
    let text = text?;
    if text.trim().is_empty() {
        return None;
    }

    let bounded = match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            warn!(
                original_len = text.chars().count(),
                limit = max_chars,
                "{} too long, truncating",
                label
            );
            &text[..cut]
        }
        None => text,
    };

    Some(bounded.trim().to_lowercase())
}

// * Specification spellings -> registry codes
fn map_spec_token(token: &str) -> Option<UnitCode> {
    let unit = match token {
        "KG" | "KILOGRAM" | "KILO" => UnitCode::Kg,
        "GRAM" | "GR" | "G" => UnitCode::G,
        "LITER" | "LITRE" | "LT" | "L" => UnitCode::L,
        "ML" | "MILILITER" | "MILLILITER" => UnitCode::Ml,
        "CC" => UnitCode::Cc,
        "METER" | "METRE" | "M" => UnitCode::M,
        "CM" | "CENTIMETER" | "SENTIMETER" => UnitCode::Cm,
        "MM" | "MILIMETER" | "MILLIMETER" => UnitCode::Mm,
        "INCH" | "INCHI" => UnitCode::Inch,
        "FEET" | "FT" => UnitCode::Feet,
        "M2" | "M²" => UnitCode::M2,
        "CM2" | "CM²" => UnitCode::Cm2,
        "MM2" | "MM²" => UnitCode::Mm2,
        "M3" | "M³" => UnitCode::M3,
        "PCS" | "PIECES" | "PIECE" | "BUAH" => UnitCode::Pcs,
        "SET" | "SETS" => UnitCode::Set,
        "PACK" | "PAK" => UnitCode::Pack,
        "BOX" | "KOTAK" => UnitCode::Box,
        "ROLL" | "GULUNGAN" => UnitCode::Roll,
        "SHEET" | "LEMBAR" | "LBR" => UnitCode::Sheet,
        "BATANG" | "BAR" | "ROD" => UnitCode::Batang,
        "UNIT" | "UNITS" => UnitCode::Unit,
        "WATT" => UnitCode::Watt,
        "VOLT" => UnitCode::Volt,
        "AMPERE" | "AMP" => UnitCode::Ampere,
        _ => return None,
    };
    Some(unit)
}
