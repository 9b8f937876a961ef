//! Deterministic rules that force a non-match.
//!
//! The brand rule runs before semantic scoring and vetoes with a score of 0.
//! The remaining rules run only after the semantic gate passed and keep its
//! score on the vetoed decision.

use std::collections::BTreeSet;

use crate::domain::decision::{MatchDecision, MatchMethod};
use crate::domain::product::ProductListing;
use crate::errors::MatchResult;
use crate::processing::features::{
    extract_numbers, extract_packaging_words, extract_spec_words, resolve_brand,
};

/// Vetoes when both brands resolve and differ with symmetric confidence:
/// both recognized or both guessed. A recognized brand against a guess
/// passes.
pub fn brand_veto(a: &ProductListing, b: &ProductListing) -> MatchResult<Option<MatchDecision>> {
    let (Some(brand_a), Some(brand_b)) = (resolve_brand(a)?, resolve_brand(b)?) else {
        return Ok(None);
    };
    if brand_a.name == brand_b.name || brand_a.known != brand_b.known {
        return Ok(None);
    }
    Ok(Some(MatchDecision::rejected(
        0.0,
        MatchMethod::BrandVeto,
        format!("Brand mismatch: '{}' vs '{}'", brand_a.name, brand_b.name),
    )))
}

fn unique_to<T: Ord + Clone>(left: &BTreeSet<T>, right: &BTreeSet<T>) -> Vec<T> {
    left.difference(right).cloned().collect()
}

fn describe(tokens: &[&str]) -> String {
    if tokens.is_empty() {
        "none".to_string()
    } else {
        tokens.join(",")
    }
}

fn word_set_veto(
    label: &str,
    method: MatchMethod,
    words_a: &BTreeSet<&'static str>,
    words_b: &BTreeSet<&'static str>,
    score: f32,
) -> Option<MatchDecision> {
    let unique_a = unique_to(words_a, words_b);
    let unique_b = unique_to(words_b, words_a);
    if unique_a.is_empty() && unique_b.is_empty() {
        return None;
    }
    Some(MatchDecision::rejected(
        score,
        method,
        format!(
            "{label} sets not identical: A has [{}] unique, B has [{}] unique",
            describe(&unique_a),
            describe(&unique_b)
        ),
    ))
}

pub fn spec_word_veto(
    title_a: &str,
    title_b: &str,
    score: f32,
) -> MatchResult<Option<MatchDecision>> {
    Ok(word_set_veto(
        "Spec word",
        MatchMethod::SpecWordVeto,
        &extract_spec_words(title_a)?,
        &extract_spec_words(title_b)?,
        score,
    ))
}

pub fn packaging_veto(
    title_a: &str,
    title_b: &str,
    score: f32,
) -> MatchResult<Option<MatchDecision>> {
    Ok(word_set_veto(
        "Packaging",
        MatchMethod::PackagingVeto,
        &extract_packaging_words(title_a)?,
        &extract_packaging_words(title_b)?,
        score,
    ))
}

/// Vetoes when both titles carry numbers and the number sets differ. A title
/// without any number never triggers this rule.
pub fn numeric_veto(
    title_a: &str,
    title_b: &str,
    score: f32,
) -> MatchResult<Option<MatchDecision>> {
    let numbers_a = extract_numbers(title_a)?;
    let numbers_b = extract_numbers(title_b)?;
    if numbers_a.is_empty() || numbers_b.is_empty() || numbers_a == numbers_b {
        return Ok(None);
    }

    let unique_a = unique_to(&numbers_a, &numbers_b);
    let unique_b = unique_to(&numbers_b, &numbers_a);
    let mut parts = Vec::new();
    if !unique_a.is_empty() {
        parts.push(format!("A has unique [{}]", unique_a.join(",")));
    }
    if !unique_b.is_empty() {
        parts.push(format!("B has unique [{}]", unique_b.join(",")));
    }
    Ok(Some(MatchDecision::rejected(
        score,
        MatchMethod::NumericVeto,
        format!("Numeric sets not identical: {}", parts.join("; ")),
    )))
}

/// Spec-word, packaging and numeric rules in that order; the first veto wins.
pub fn post_semantic_vetoes(
    title_a: &str,
    title_b: &str,
    score: f32,
) -> MatchResult<Option<MatchDecision>> {
    if let Some(veto) = spec_word_veto(title_a, title_b, score)? {
        return Ok(Some(veto));
    }
    if let Some(veto) = packaging_veto(title_a, title_b, score)? {
        return Ok(Some(veto));
    }
    numeric_veto(title_a, title_b, score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str) -> ProductListing {
        ProductListing::new(title)
    }

    #[test]
    fn distinct_known_brands_veto_with_zero_score() {
        let veto = brand_veto(&listing("Samsung Galaxy M14 5G"), &listing("Apple iPhone 13"))
            .expect("rule runs")
            .expect("brands conflict");

        assert!(!veto.matched);
        assert_eq!(veto.score, 0.0);
        assert_eq!(veto.method, MatchMethod::BrandVeto);
        assert_eq!(veto.reason, "Brand mismatch: 'samsung' vs 'apple'");
    }

    #[test]
    fn distinct_guessed_brands_veto() {
        let veto = brand_veto(&listing("Zebronics Thunder"), &listing("Portronics Muffs"))
            .expect("rule runs");
        assert_eq!(veto.map(|v| v.method), Some(MatchMethod::BrandVeto));
    }

    #[test]
    fn known_against_guessed_brand_passes() {
        let veto = brand_veto(&listing("Wireless Earbuds Airdopes"), &listing("boAt Airdopes"))
            .expect("rule runs");
        assert!(veto.is_none());
    }

    #[test]
    fn same_brand_or_missing_brand_passes() {
        assert!(
            brand_veto(&listing("boAt Airdopes 141"), &listing("Airdopes by boAt"))
                .expect("rule runs")
                .is_none()
        );
        assert!(
            brand_veto(&listing("A pair of socks"), &listing("Apple iPhone 13"))
                .expect("rule runs")
                .is_none()
        );
    }

    #[test]
    fn extra_spec_word_vetoes_and_keeps_score() {
        let veto = spec_word_veto("Apple iPhone 15 Pro 128GB", "Apple iPhone 15 128GB", 0.93)
            .expect("rule runs")
            .expect("spec words differ");

        assert_eq!(veto.method, MatchMethod::SpecWordVeto);
        assert_eq!(veto.score, 0.93);
        assert_eq!(
            veto.reason,
            "Spec word sets not identical: A has [pro] unique, B has [none] unique"
        );
    }

    #[test]
    fn packaging_mismatch_vetoes() {
        let veto = packaging_veto("Dove Soap Pack of 3", "Dove Soap", 0.9)
            .expect("rule runs")
            .expect("packaging differs");
        assert_eq!(veto.method, MatchMethod::PackagingVeto);
        assert!(veto.reason.contains("pack,pack of"));
    }

    #[test]
    fn numeric_mismatch_names_both_sides() {
        let veto = numeric_veto("boAt Airdopes 141", "boAt Airdopes 131", 0.95)
            .expect("rule runs")
            .expect("numbers differ");

        assert_eq!(veto.method, MatchMethod::NumericVeto);
        assert_eq!(
            veto.reason,
            "Numeric sets not identical: A has unique [141]; B has unique [131]"
        );
    }

    #[test]
    fn numeric_rule_needs_numbers_on_both_sides() {
        assert!(
            numeric_veto("boAt Airdopes", "boAt Airdopes", 0.9)
                .expect("rule runs")
                .is_none()
        );
        assert!(
            numeric_veto("boAt Airdopes 141", "boAt Airdopes", 0.9)
                .expect("rule runs")
                .is_none()
        );
        assert!(
            numeric_veto("Redmi 12 5G", "Redmi 5G 12", 0.9)
                .expect("rule runs")
                .is_none()
        );
    }

    #[test]
    fn post_semantic_chain_checks_spec_words_first() {
        let veto = post_semantic_vetoes("Redmi Note 13 Pro", "Redmi Note 12", 0.9)
            .expect("rule runs")
            .expect("vetoed");
        assert_eq!(veto.method, MatchMethod::SpecWordVeto);
    }
}
