// * Unit Refinery
// * Normalized unit codes, the synonym registry, name/specification extraction and
// * detail page resolution.

pub mod code;
pub mod dom;
pub mod error;
pub mod extractor;
pub mod registry;
pub mod resolver;

pub use code::{UnitCategory, UnitCode, UnknownUnitCode};
pub use dom::{DomTree, HtmlParser, ScraperDom, ScraperParser};
pub use error::UnitError;
pub use extractor::{Strategy, UnitExtractor};
pub use registry::UnitPatternRegistry;
pub use resolver::{DetailPageUnitResolver, ResolverConfig};
