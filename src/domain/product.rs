use serde::{Deserialize, Serialize};

/// A single listing as produced by a marketplace scraper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductListing {
    pub title: String,
    pub brand: Option<String>,
    /// Price exactly as scraped, e.g. `₹1,299.00`.
    pub price: String,
    pub link: String,
    pub image: String,
    /// Marketplace tag such as `amazon` or `flipkart`.
    pub source: String,
}

impl ProductListing {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}
