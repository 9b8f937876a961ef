//! Pairwise matching and best-match search.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future;

use crate::domain::decision::{BestMatch, MatchDecision, MatchMethod};
use crate::domain::product::ProductListing;
use crate::errors::{EmbeddingError, MatchError};
use crate::models::config::MatcherConfig;
use crate::processing::cache::{MatchCache, canonical_key};
use crate::processing::embedding::Embedder;
use crate::processing::semantic::{SemanticScorer, embedding_failure, semantic_decision};
use crate::processing::veto::{brand_veto, post_semantic_vetoes};

/// Why a pair produced no cacheable decision.
enum PairFailure {
    Embedding(EmbeddingError),
    Fault(MatchError),
}

impl From<EmbeddingError> for PairFailure {
    fn from(error: EmbeddingError) -> Self {
        PairFailure::Embedding(error)
    }
}

impl From<MatchError> for PairFailure {
    fn from(error: MatchError) -> Self {
        PairFailure::Fault(error)
    }
}

/// Decides whether two listings describe the same product.
///
/// Every call returns a [`MatchDecision`]; input problems, embedding outages
/// and faults inside the rule chain all come back as non-matches.
pub struct ProductMatcher {
    config: MatcherConfig,
    scorer: SemanticScorer,
    cache: MatchCache,
}

impl ProductMatcher {
    pub fn new(embedder: Arc<dyn Embedder>, config: MatcherConfig) -> Self {
        Self {
            config,
            scorer: SemanticScorer::new(embedder),
            cache: MatchCache::new(),
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    /// Compares `a` against `b`, consulting and filling the decision cache.
    ///
    /// Decisions caused by an embedding failure or an internal fault are
    /// returned but not cached, so a later call can succeed.
    pub async fn match_products(&self, a: &ProductListing, b: &ProductListing) -> MatchDecision {
        if a.title.trim().is_empty() || b.title.trim().is_empty() {
            return MatchDecision::rejected(
                0.0,
                MatchMethod::InputError,
                "One or both products lack a title.",
            );
        }

        let key = canonical_key(&a.title, &b.title);
        if let Some(stored) = self.cache.get(&key) {
            log::debug!("Cache hit for \"{}\" vs \"{}\"", a.title, b.title);
            return stored.as_cache_hit();
        }
        log::debug!("Cache miss for \"{}\" vs \"{}\"", a.title, b.title);

        match AssertUnwindSafe(self.evaluate(a, b)).catch_unwind().await {
            Ok(Ok(decision)) => {
                self.cache.insert(key, decision.clone());
                decision
            }
            Ok(Err(PairFailure::Embedding(error))) => embedding_failure(&error),
            Ok(Err(PairFailure::Fault(error))) => fault_decision(&error),
            Err(panic) => fault_decision(&MatchError::Internal(panic_message(panic.as_ref()))),
        }
    }

    async fn evaluate(
        &self,
        a: &ProductListing,
        b: &ProductListing,
    ) -> Result<MatchDecision, PairFailure> {
        if let Some(veto) = brand_veto(a, b)? {
            log::debug!("{}: {}", veto.method, veto.reason);
            return Ok(veto);
        }

        let score = self.scorer.similarity(&a.title, &b.title).await?;
        let semantic = semantic_decision(score, self.config.semantic_threshold());
        if !semantic.matched {
            return Ok(semantic);
        }

        if let Some(veto) = post_semantic_vetoes(&a.title, &b.title, score)? {
            log::debug!("{}: {}", veto.method, veto.reason);
            return Ok(veto);
        }
        Ok(semantic)
    }

    /// Compares `target` with every candidate concurrently and returns the
    /// matched candidate with the strictly highest score. On equal scores the
    /// earlier candidate wins.
    pub async fn find_best_match(
        &self,
        target: &ProductListing,
        candidates: &[ProductListing],
    ) -> Option<BestMatch> {
        let comparisons = candidates.iter().map(|candidate| async move {
            (candidate, self.match_products(target, candidate).await)
        });
        let results = future::join_all(comparisons).await;

        let mut best: Option<(&ProductListing, MatchDecision)> = None;
        for (candidate, decision) in results {
            if !decision.matched {
                continue;
            }
            if best
                .as_ref()
                .is_none_or(|(_, current)| decision.score > current.score)
            {
                best = Some((candidate, decision));
            }
        }

        match best {
            Some((item, decision)) => {
                log::info!(
                    "Best match for \"{}\": \"{}\" ({:.3}, {})",
                    target.title,
                    item.title,
                    decision.score,
                    decision.method
                );
                Some(BestMatch {
                    item: item.clone(),
                    decision,
                })
            }
            None => {
                log::info!("No match found for \"{}\"", target.title);
                None
            }
        }
    }
}

fn fault_decision(error: &MatchError) -> MatchDecision {
    log::error!("Comparison failed: {error}");
    MatchDecision::rejected(0.0, MatchMethod::InternalFault, error.to_string())
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "comparison panicked".to_string()
    }
}
