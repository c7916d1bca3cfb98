use serde::{Deserialize, Serialize};

use crate::units::code::UnitCode;

/// A scraped product listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    /// Price in whole rupiah
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Product {
    pub fn new(name: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            price,
            url: None,
            unit: None,
            location: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_unit(mut self, unit: UnitCode) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Non-blank product link, if any
    pub fn detail_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

/// Output of one vendor scrape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapingResult {
    #[serde(default)]
    pub products: Vec<Product>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ScrapingResult {
    pub fn succeeded(products: Vec<Product>) -> Self {
        Self {
            products,
            success: true,
            error_message: None,
            url: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            products: Vec::new(),
            success: false,
            error_message: Some(message.into()),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}
