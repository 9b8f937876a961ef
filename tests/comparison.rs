mod common;

use std::sync::Arc;

use common::StubEmbedder;
use product_matcher::domain::comparison::PriceWinner;
use product_matcher::domain::product::ProductListing;
use product_matcher::models::config::MatcherConfig;
use product_matcher::processing::comparison::compare_catalogs;
use product_matcher::processing::matcher::ProductMatcher;

fn flipkart(title: &str, price: &str) -> ProductListing {
    ProductListing {
        link: format!("https://www.flipkart.com/{}", title.replace(' ', "-")),
        image: "https://rukminim2.flixcart.com/image.jpeg".to_string(),
        ..ProductListing::new(title).with_price(price).with_source("flipkart")
    }
}

fn amazon(title: &str, price: &str) -> ProductListing {
    ProductListing {
        link: format!("https://www.amazon.in/{}", title.replace(' ', "-")),
        image: "https://m.media-amazon.com/images/I/image.jpg".to_string(),
        ..ProductListing::new(title).with_price(price).with_source("amazon")
    }
}

fn matcher() -> ProductMatcher {
    ProductMatcher::new(Arc::new(StubEmbedder::default()), MatcherConfig::default())
}

#[tokio::test]
async fn matched_listings_become_price_comparisons() {
    let catalog_b = vec![
        flipkart("boAt Airdopes 141 Bluetooth Earbuds", "₹1,099"),
        flipkart("Samsung Galaxy M14 5G", "₹13,490"),
    ];
    let catalog_a = vec![
        amazon("Apple iPhone 13", "₹52,999"),
        amazon("boAt Airdopes 141 Bluetooth Earbuds Black", "₹999"),
    ];

    let report = compare_catalogs(&matcher(), &catalog_b, &catalog_a).await;

    assert_eq!(report.results.len(), 1);
    let record = &report.results[0];
    assert_eq!(record.title, "boAt Airdopes 141 Bluetooth Earbuds");
    assert_eq!(record.price_a, Some(999.0));
    assert_eq!(record.price_b, Some(1099.0));
    assert_eq!(record.winner, PriceWinner::SourceA);
    assert!(record.link_a.starts_with("https://www.amazon.in/"));
    assert!(record.link_b.starts_with("https://www.flipkart.com/"));
    assert!(report.logs[0].contains("2 products in catalog A"));
}

#[tokio::test]
async fn no_common_products_is_reported_in_logs() {
    let catalog_b = vec![flipkart("Samsung Galaxy M14 5G", "₹13,490")];
    let catalog_a = vec![amazon("Apple iPhone 13", "₹52,999")];

    let report = compare_catalogs(&matcher(), &catalog_b, &catalog_a).await;

    assert!(report.results.is_empty());
    assert!(
        report
            .logs
            .iter()
            .any(|line| line.starts_with("Couldn't find any common products"))
    );
}

#[tokio::test]
async fn report_serializes_with_kebab_case_winner() {
    let catalog_b = vec![flipkart(
        "boAt Airdopes 141 Bluetooth Earbuds",
        "Price unavailable",
    )];
    let catalog_a = vec![amazon("boAt Airdopes 141 Bluetooth Earbuds Black", "₹999")];

    let report = compare_catalogs(&matcher(), &catalog_b, &catalog_a).await;
    let json = serde_json::to_value(&report).expect("report serializes");

    assert_eq!(json["results"][0]["winner"], "unknown");
    assert!(json["results"][0]["price_b"].is_null());
    assert!(json["scraped_on"].is_string());
}
