use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::product::ProductListing;

/// The rule that decided a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMethod {
    BrandVeto,
    SpecWordVeto,
    PackagingVeto,
    NumericVeto,
    Semantic,
    CacheHit,
    InputError,
    InternalFault,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::BrandVeto => "brand-veto",
            MatchMethod::SpecWordVeto => "spec-word-veto",
            MatchMethod::PackagingVeto => "packaging-veto",
            MatchMethod::NumericVeto => "numeric-veto",
            MatchMethod::Semantic => "semantic",
            MatchMethod::CacheHit => "cache-hit",
            MatchMethod::InputError => "input-error",
            MatchMethod::InternalFault => "internal-fault",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of comparing two listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDecision {
    pub matched: bool,
    pub score: f32,
    pub method: MatchMethod,
    pub reason: String,
}

impl MatchDecision {
    pub fn matched(score: f32, method: MatchMethod, reason: impl Into<String>) -> Self {
        Self {
            matched: true,
            score,
            method,
            reason: reason.into(),
        }
    }

    pub fn rejected(score: f32, method: MatchMethod, reason: impl Into<String>) -> Self {
        Self {
            matched: false,
            score,
            method,
            reason: reason.into(),
        }
    }

    /// Copy of a stored decision as returned from the cache.
    pub(crate) fn as_cache_hit(&self) -> Self {
        Self {
            matched: self.matched,
            score: self.score,
            method: MatchMethod::CacheHit,
            reason: format!("cached {}: {}", self.method, self.reason),
        }
    }
}

/// The winning candidate of a best-match search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestMatch {
    pub item: ProductListing,
    pub decision: MatchDecision,
}

#[cfg(test)]
mod tests {
    use super::{MatchDecision, MatchMethod};

    #[test]
    fn methods_serialize_kebab_case() {
        let json = serde_json::to_string(&MatchMethod::SpecWordVeto).expect("serializable");
        assert_eq!(json, "\"spec-word-veto\"");
        assert_eq!(MatchMethod::SpecWordVeto.to_string(), "spec-word-veto");
    }

    #[test]
    fn cache_hit_keeps_outcome_and_cites_rule() {
        let stored = MatchDecision::rejected(0.91, MatchMethod::NumericVeto, "A has unique [141]");
        let hit = stored.as_cache_hit();

        assert_eq!(hit.method, MatchMethod::CacheHit);
        assert_eq!(hit.score, stored.score);
        assert!(!hit.matched);
        assert_eq!(hit.reason, "cached numeric-veto: A has unique [141]");
    }
}
