//! Token-level features pulled out of listing titles.
//!
//! Every vocabulary is compiled once into word-boundary regexes. Compilation
//! errors are kept in the static and reported on use, so extraction returns a
//! [`MatchResult`] instead of panicking.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::product::ProductListing;
use crate::errors::{MatchError, MatchResult};
use crate::processing::normalize::normalize_text;

/// Known brands, checked in this order.
pub const KNOWN_BRANDS: &[&str] = &[
    "apple", "samsung", "google", "oneplus", "xiaomi", "redmi", "oppo", "vivo",
    "realme", "motorola", "nokia", "sony", "lg", "asus", "poco", "boat",
    "jbl", "sennheiser", "bose", "hp", "dell", "lenovo", "acer", "msi",
    "noise", "fire-boltt", "amazfit", "garmin", "fitbit", "spigen", "anker",
    "logitech", "razer", "corsair", "whirlpool", "panasonic", "toshiba",
    "intel", "amd", "nvidia", "gopro", "dji", "canon", "nikon",
    "l'oreal", "maybelline", "revlon", "nyx", "lakme", "mac", "sugar",
    "himalaya", "nivea", "dove", "olay", "ponds", "adidas", "nike", "puma",
    "cetaphil",
];

/// Variant modifiers that distinguish otherwise identical models.
pub const SPEC_WORDS: &[&str] = &[
    "pro", "plus", "ultra", "max", "lite", "fe", "fan edition", "se", "go", "mini",
];

pub const PACKAGING_WORDS: &[&str] = &["combo", "pack", "set", "pack of", "set of"];

const STOP_WORDS: &[&str] = &["the", "new", "a", "an", "for", "with", "of"];

/// Terms paired with their precompiled whole-word matchers.
pub struct Vocabulary {
    terms: Vec<(&'static str, Regex)>,
}

impl Vocabulary {
    /// Compiles `\bterm\b` for each term, letting inner spaces match any
    /// whitespace run.
    pub fn compile(terms: &[&'static str]) -> MatchResult<Self> {
        let terms = terms
            .iter()
            .map(|&term| {
                let body = term
                    .split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+");
                Regex::new(&format!(r"\b{body}\b"))
                    .map(|regex| (term, regex))
                    .map_err(|error| MatchError::Vocabulary {
                        term: term.to_string(),
                        message: error.to_string(),
                    })
            })
            .collect::<MatchResult<Vec<_>>>()?;
        Ok(Self { terms })
    }

    /// First term, in vocabulary order, found in `text`.
    pub fn first_match(&self, text: &str) -> Option<&'static str> {
        self.terms
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(term, _)| *term)
    }

    pub fn matches(&self, text: &str) -> BTreeSet<&'static str> {
        self.terms
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(term, _)| *term)
            .collect()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|(known, _)| *known == term)
    }
}

static BRAND_VOCABULARY: LazyLock<MatchResult<Vocabulary>> =
    LazyLock::new(|| Vocabulary::compile(KNOWN_BRANDS));
static SPEC_VOCABULARY: LazyLock<MatchResult<Vocabulary>> =
    LazyLock::new(|| Vocabulary::compile(SPEC_WORDS));
static PACKAGING_VOCABULARY: LazyLock<MatchResult<Vocabulary>> =
    LazyLock::new(|| Vocabulary::compile(PACKAGING_WORDS));
static NUMBER_PATTERN: LazyLock<MatchResult<Regex>> = LazyLock::new(|| {
    Regex::new(r"[0-9]+(?:\.[0-9]+)?").map_err(|error| MatchError::Vocabulary {
        term: "<number>".to_string(),
        message: error.to_string(),
    })
});

fn vocabulary(
    cell: &'static LazyLock<MatchResult<Vocabulary>>,
) -> MatchResult<&'static Vocabulary> {
    LazyLock::force(cell).as_ref().map_err(Clone::clone)
}

/// Brand of a listing together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBrand {
    pub name: String,
    /// `true` when the name is in [`KNOWN_BRANDS`]; `false` for first-word
    /// guesses and unrecognized explicit brands.
    pub known: bool,
}

/// Brand found in a title: a vocabulary hit, else the first word when it is
/// not a stop word and longer than two characters.
///
/// The first-word fallback is a heuristic and misfires on unbranded titles.
pub fn extract_brand(title: &str) -> MatchResult<Option<String>> {
    let normalized = normalize_text(title);
    if normalized.is_empty() {
        return Ok(None);
    }
    if let Some(brand) = vocabulary(&BRAND_VOCABULARY)?.first_match(&normalized) {
        return Ok(Some(brand.to_string()));
    }
    let guess = normalized
        .split(' ')
        .next()
        .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(word))
        .map(str::to_string);
    Ok(guess)
}

/// Explicit brand field when set, otherwise [`extract_brand`] on the title.
pub fn resolve_brand(listing: &ProductListing) -> MatchResult<Option<ResolvedBrand>> {
    let explicit = listing
        .brand
        .as_deref()
        .map(normalize_text)
        .filter(|brand| !brand.is_empty());
    let name = match explicit {
        Some(brand) => Some(brand),
        None => extract_brand(&listing.title)?,
    };
    let brands = vocabulary(&BRAND_VOCABULARY)?;
    Ok(name.map(|name| ResolvedBrand {
        known: brands.contains(&name),
        name,
    }))
}

pub fn extract_spec_words(title: &str) -> MatchResult<BTreeSet<&'static str>> {
    Ok(vocabulary(&SPEC_VOCABULARY)?.matches(&normalize_text(title)))
}

pub fn extract_packaging_words(title: &str) -> MatchResult<BTreeSet<&'static str>> {
    Ok(vocabulary(&PACKAGING_VOCABULARY)?.matches(&normalize_text(title)))
}

/// Distinct integer and decimal substrings of `title`.
pub fn extract_numbers(title: &str) -> MatchResult<BTreeSet<String>> {
    let pattern = LazyLock::force(&NUMBER_PATTERN).as_ref().map_err(Clone::clone)?;
    Ok(pattern
        .find_iter(title)
        .map(|found| found.as_str().to_string())
        .collect())
}
