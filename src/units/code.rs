// * Normalized unit-of-measure codes.
// * Every code the engine emits comes from this enum; the only free-form value is the
// * short pass-through token accepted from specification tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// * Longest free-form token accepted as an already-normalized code
pub const PASS_THROUGH_MAX_CHARS: usize = 4;

// * Placeholder some vendors put in size columns ("60 x 60" -> "X")
const PLACEHOLDER: &str = "X";

/// A normalized unit of measure attached to a product
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum UnitCode {
    // * Weight
    Kg,
    G,
    // * Volume
    L,
    Ml,
    Cc,
    M3,
    // * Length
    M,
    Cm,
    Mm,
    Inch,
    Feet,
    // * Area
    M2,
    Cm2,
    Mm2,
    // * Count / packaging
    Pcs,
    Set,
    Pack,
    Box,
    Roll,
    Sheet,
    Batang,
    Lembar,
    Unit,
    // * Electrical
    Watt,
    Volt,
    Ampere,
    /// Short uppercase token taken verbatim from a specification value
    Other(String),
}

/// Broad family a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitCategory {
    Area,
    Volume,
    Weight,
    Length,
    Count,
    Electrical,
    Other,
}

impl UnitCode {
    /// Every registry code, in declaration order
    pub const KNOWN: [UnitCode; 26] = [
        UnitCode::Kg,
        UnitCode::G,
        UnitCode::L,
        UnitCode::Ml,
        UnitCode::Cc,
        UnitCode::M3,
        UnitCode::M,
        UnitCode::Cm,
        UnitCode::Mm,
        UnitCode::Inch,
        UnitCode::Feet,
        UnitCode::M2,
        UnitCode::Cm2,
        UnitCode::Mm2,
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

    /// Returns the canonical code text ("KG", "M²", ...)
    pub fn as_str(&self) -> &str {
        match self {
            UnitCode::Kg => "KG",
            UnitCode::G => "G",
            UnitCode::L => "L",
            UnitCode::Ml => "ML",
            UnitCode::Cc => "CC",
            UnitCode::M3 => "M³",
            UnitCode::M => "M",
            UnitCode::Cm => "CM",
            UnitCode::Mm => "MM",
            UnitCode::Inch => "INCH",
            UnitCode::Feet => "FEET",
            UnitCode::M2 => "M²",
            UnitCode::Cm2 => "CM²",
            UnitCode::Mm2 => "MM²",
            UnitCode::Pcs => "PCS",
            UnitCode::Set => "SET",
            UnitCode::Pack => "PACK",
            UnitCode::Box => "BOX",
            UnitCode::Roll => "ROLL",
            UnitCode::Sheet => "SHEET",
            UnitCode::Batang => "BATANG",
            UnitCode::Lembar => "LEMBAR",
            UnitCode::Unit => "UNIT",
            UnitCode::Watt => "WATT",
            UnitCode::Volt => "VOLT",
            UnitCode::Ampere => "AMPERE",
            UnitCode::Other(token) => token,
        }
    }

    /// Returns the family this unit belongs to
    pub fn category(&self) -> UnitCategory {
        match self {
            UnitCode::M2 | UnitCode::Cm2 | UnitCode::Mm2 => UnitCategory::Area,
            UnitCode::L | UnitCode::Ml | UnitCode::Cc | UnitCode::M3 => UnitCategory::Volume,
            UnitCode::Kg | UnitCode::G => UnitCategory::Weight,
            UnitCode::M | UnitCode::Cm | UnitCode::Mm | UnitCode::Inch | UnitCode::Feet => {
                UnitCategory::Length
            }
            UnitCode::Pcs
            | UnitCode::Set
            | UnitCode::Pack
            | UnitCode::Box
            | UnitCode::Roll
            | UnitCode::Sheet
            | UnitCode::Batang
            | UnitCode::Lembar
            | UnitCode::Unit => UnitCategory::Count,
            UnitCode::Watt | UnitCode::Volt | UnitCode::Ampere => UnitCategory::Electrical,
            UnitCode::Other(_) => UnitCategory::Other,
        }
    }

    /// True for the literal "X" placeholder, which never counts as a resolved unit
    pub fn is_placeholder(&self) -> bool {
        matches!(self, UnitCode::Other(token) if token == PLACEHOLDER)
    }

    /// Looks up a registry code by its canonical text, case-insensitive.
    /// ASCII digit spellings of the superscripts ("M2", "CM3") are accepted.
    pub fn from_code(code: &str) -> Option<UnitCode> {
        let upper = code.trim().to_uppercase().replace('2', "²").replace('3', "³");
        Self::KNOWN.into_iter().find(|known| known.as_str() == upper)
    }
}

impl fmt::Display for UnitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is neither a registry code nor a valid pass-through token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Not a unit code: '{0}'")]
pub struct UnknownUnitCode(pub String);

impl FromStr for UnitCode {
    type Err = UnknownUnitCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(code) = Self::from_code(s) {
            return Ok(code);
        }

        let token = s.trim().to_uppercase();
        if !token.is_empty() && token.chars().count() <= PASS_THROUGH_MAX_CHARS {
            Ok(UnitCode::Other(token))
        } else {
            Err(UnknownUnitCode(s.to_string()))
        }
    }
}

impl From<UnitCode> for String {
    fn from(code: UnitCode) -> Self {
        code.as_str().to_string()
    }
}

impl TryFrom<String> for UnitCode {
    type Error = UnknownUnitCode;

    // * Stored data obeys the same pass-through limit as extracted tokens
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
