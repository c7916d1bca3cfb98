use thiserror::Error;

// * Faults inside the unit engine. None of these reach callers of the public
// * extraction API; they are logged and converted to "no match" / PCS at the boundary.
#[derive(Error, Debug, Clone)]
pub enum UnitError {
    #[error("Pattern '{pattern}' failed to compile: {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("HTML parse failed: {0}")]
    Parse(String),
}

impl UnitError {
    pub fn pattern(pattern: &str, err: &regex::Error) -> Self {
        UnitError::Pattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        }
    }
}
