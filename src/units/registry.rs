// * Unit pattern registry: synonym table and tie-break priority order.
// * Built once and never mutated, so it can be shared freely across threads.

use crate::units::code::UnitCode;

// * Synonyms per code, lowercase. Entries are literal text; the extractor escapes them.
// * SHEET and LEMBAR share their spellings on purpose: SHEET sits earlier in the
// * priority order and always wins the generic scan.
const SYNONYMS: &[(UnitCode, &[&str])] = &[
    (UnitCode::Kg, &["kg", "kilogram", "kilo"]),
    (UnitCode::G, &["gram", "gr", "g"]),
    (UnitCode::L, &["liter", "litre", "lt", "l"]),
    (UnitCode::Ml, &["ml", "mililiter", "milliliter"]),
    (UnitCode::Cc, &["cc"]),
    (UnitCode::M, &["meter", "metre", "m"]),
    (UnitCode::Cm, &["cm", "centimeter", "sentimeter"]),
    (UnitCode::Mm, &["mm", "milimeter", "millimeter"]),
    (UnitCode::Inch, &["inch", "inchi", "\"", "″"]),
    (UnitCode::Feet, &["feet", "ft", "'", "′"]),
    (UnitCode::M2, &["m²", "m2", "meter persegi", "square meter"]),
    (
        UnitCode::Cm2,
        &["cm²", "cm2", "centimeter persegi", "sentimeter persegi"],
    ),
    (UnitCode::Mm2, &["mm²", "mm2"]),
    (UnitCode::M3, &["m³", "m3", "meter kubik", "cubic meter"]),
    (
        UnitCode::Pcs,
        &["pcs", "pieces", "piece", "buah", "biji", "angka"],
    ),
    (UnitCode::Set, &["set", "sets"]),
    (UnitCode::Pack, &["pack", "pak", "kemasan"]),
    (UnitCode::Box, &["box", "kotak", "dus"]),
    (UnitCode::Roll, &["roll", "gulungan", "gulung"]),
    (UnitCode::Sheet, &["sheet", "lembar", "lbr"]),
    (UnitCode::Batang, &["batang", "bar", "rod", "stick"]),
    (UnitCode::Lembar, &["lembar", "sheet", "lbr"]),
    (UnitCode::Unit, &["unit", "units"]),
    (UnitCode::Watt, &["watt", "w", "daya"]),
    (UnitCode::Volt, &["volt", "v"]),
    (UnitCode::Ampere, &["ampere", "amp", "a"]),
];

// * Tie-break order for the generic keyword scan.
// * Area first (a tile's "60x60cm" says more than a bare "cm"), then volume, weight,
// * linear, liquid volume, count and electrical.
const PRIORITY_ORDER: &[UnitCode] = &[
    UnitCode::M2,
    UnitCode::Cm2,
    UnitCode::Mm2,
    UnitCode::M3,
    UnitCode::Kg,
    UnitCode::G,
    UnitCode::M,
    UnitCode::Cm,
    UnitCode::Mm,
    UnitCode::Inch,
    UnitCode::Feet,
    UnitCode::L,
    UnitCode::Ml,
    UnitCode::Cc,
    UnitCode::Pcs,
    UnitCode::Set,
    UnitCode::Pack,
    UnitCode::Box,
    UnitCode::Roll,
    UnitCode::Sheet,
    UnitCode::Batang,
    UnitCode::Lembar,
    UnitCode::Unit,
    UnitCode::Watt,
    UnitCode::Volt,
    UnitCode::Ampere,
];

/// Static knowledge base of unit synonyms and their priority order
#[derive(Debug, Clone, Copy)]
pub struct UnitPatternRegistry {
    synonyms: &'static [(UnitCode, &'static [&'static str])],
    priority: &'static [UnitCode],
}

impl UnitPatternRegistry {
    /// Creates the registry with the built-in tables
    pub fn new() -> Self {
        Self {
            synonyms: SYNONYMS,
            priority: PRIORITY_ORDER,
        }
    }

    /// Returns the ordered synonym set for a code (empty for pass-through codes)
    pub fn synonyms_for(&self, code: &UnitCode) -> &'static [&'static str] {
        self.synonyms
            .iter()
            .find(|(candidate, _)| candidate == code)
            .map(|(_, synonyms)| *synonyms)
            .unwrap_or(&[])
    }

    /// Returns the tie-break order used by the generic keyword scan
    pub fn priority_order(&self) -> &'static [UnitCode] {
        self.priority
    }

    /// Iterates every code that has synonyms
    pub fn codes(&self) -> impl Iterator<Item = &'static UnitCode> {
        self.synonyms.iter().map(|(code, _)| code)
    }

    /// Returns the first code in priority order that lists the synonym
    pub fn owner_of(&self, synonym: &str) -> Option<&'static UnitCode> {
        let needle = synonym.to_lowercase();
        self.priority
            .iter()
            .find(|code| self.synonyms_for(code).iter().any(|s| *s == needle))
    }
}

impl Default for UnitPatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_priority_order_is_total_over_codes() {
        let registry = UnitPatternRegistry::new();
        let ordered: HashSet<_> = registry.priority_order().iter().collect();
        let coded: HashSet<_> = registry.codes().collect();

        assert_eq!(ordered.len(), registry.priority_order().len(), "no duplicates");
        assert_eq!(ordered, coded);
        assert_eq!(coded.len(), UnitCode::KNOWN.len());
    }

    #[test]
    fn test_area_codes_lead_priority() {
        let registry = UnitPatternRegistry::new();
        let order = registry.priority_order();
        assert_eq!(order[0], UnitCode::M2);
        assert_eq!(order[1], UnitCode::Cm2);

        let pos = |code: UnitCode| order.iter().position(|c| *c == code).unwrap();
        assert!(pos(UnitCode::M3) < pos(UnitCode::Kg));
        assert!(pos(UnitCode::Kg) < pos(UnitCode::M));
        assert!(pos(UnitCode::Feet) < pos(UnitCode::L));
        assert!(pos(UnitCode::Cc) < pos(UnitCode::Pcs));
        assert!(pos(UnitCode::Unit) < pos(UnitCode::Watt));
    }

    #[test]
    fn test_synonyms_lookup() {
        let registry = UnitPatternRegistry::new();
        assert_eq!(registry.synonyms_for(&UnitCode::Kg), &["kg", "kilogram", "kilo"]);
        assert!(registry.synonyms_for(&UnitCode::Other("DZ".into())).is_empty());
    }

    #[test]
    fn test_shared_synonyms_resolve_to_earlier_code() {
        let registry = UnitPatternRegistry::new();
        assert_eq!(registry.owner_of("lembar"), Some(&UnitCode::Sheet));
        assert_eq!(registry.owner_of("LBR"), Some(&UnitCode::Sheet));
        assert_eq!(registry.owner_of("kilo"), Some(&UnitCode::Kg));
        assert_eq!(registry.owner_of("furlong"), None);
    }
}
