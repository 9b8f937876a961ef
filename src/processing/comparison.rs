use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;

use crate::domain::comparison::{ComparisonRecord, ComparisonReport, PriceWinner};
use crate::domain::product::ProductListing;
use crate::processing::matcher::ProductMatcher;

static PRICE_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"[0-9][0-9,]*(?:\.[0-9]+)?"));

/// Numeric value of a scraped price such as `₹1,299.00`.
///
/// The first number in the text is used, with thousands separators dropped,
/// so `₹1,099.00 ₹1,499.00` (sale and list price) reads as 1099.
pub fn parse_price(raw: &str) -> Option<f64> {
    let pattern = LazyLock::force(&PRICE_PATTERN).as_ref().ok()?;
    let digits = pattern.find(raw)?.as_str().replace(',', "");
    digits.parse::<f64>().ok().filter(|price| price.is_finite())
}

pub fn price_winner(price_a: Option<f64>, price_b: Option<f64>) -> PriceWinner {
    match (price_a, price_b) {
        (Some(a), Some(b)) if a < b => PriceWinner::SourceA,
        (Some(a), Some(b)) if b < a => PriceWinner::SourceB,
        (Some(_), Some(_)) => PriceWinner::SamePrice,
        _ => PriceWinner::Unknown,
    }
}

fn combine(target: &ProductListing, matched: &ProductListing) -> ComparisonRecord {
    let price_a = parse_price(&matched.price);
    let price_b = parse_price(&target.price);
    ComparisonRecord {
        title: target.title.clone(),
        price_a,
        price_b,
        winner: price_winner(price_a, price_b),
        link_a: matched.link.clone(),
        link_b: target.link.clone(),
        image_a: matched.image.clone(),
        image_b: target.image.clone(),
    }
}

/// Finds, for every listing of catalog B, its best match in catalog A and
/// combines each hit into a price comparison.
///
/// Targets are processed one after another; the candidates of each target
/// are compared concurrently by [`ProductMatcher::find_best_match`].
pub async fn compare_catalogs(
    matcher: &ProductMatcher,
    catalog_b: &[ProductListing],
    catalog_a: &[ProductListing],
) -> ComparisonReport {
    let mut logs = vec![format!(
        "Found {} products in catalog A and {} products in catalog B.",
        catalog_a.len(),
        catalog_b.len()
    )];

    let mut results = Vec::new();
    for target in catalog_b {
        if let Some(best) = matcher.find_best_match(target, catalog_a).await {
            results.push(combine(target, &best.item));
        }
    }

    if results.is_empty() {
        logs.push(
            "Couldn't find any common products between the two catalogs based on their titles."
                .to_string(),
        );
    } else {
        logs.push(format!("Matched {} common products.", results.len()));
    }
    log::info!(
        "Finished catalog comparison: catalog_a={}, catalog_b={}, matched={}, cached_decisions={}",
        catalog_a.len(),
        catalog_b.len(),
        results.len(),
        matcher.cache().len()
    );

    ComparisonReport {
        logs,
        results,
        scraped_on: Utc::now(),
    }
}
