use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which side of the comparison lists the product cheaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceWinner {
    SourceA,
    SourceB,
    SamePrice,
    Unknown,
}

/// A matched pair of listings, combined for display or persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    pub title: String,
    pub price_a: Option<f64>,
    pub price_b: Option<f64>,
    pub winner: PriceWinner,
    pub link_a: String,
    pub link_b: String,
    pub image_a: String,
    pub image_b: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub logs: Vec<String>,
    pub results: Vec<ComparisonRecord>,
    pub scraped_on: DateTime<Utc>,
}
