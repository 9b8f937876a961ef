use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::decision::MatchDecision;

/// Two titles in sorted order.
pub type PairKey = (String, String);

/// Order-independent key for a pair of titles.
pub fn canonical_key(title_a: &str, title_b: &str) -> PairKey {
    let (first, second) = if title_a <= title_b {
        (title_a, title_b)
    } else {
        (title_b, title_a)
    };
    (first.to_string(), second.to_string())
}

/// In-memory memo of pairwise decisions.
///
/// Entries live as long as the cache and are never evicted. Two callers
/// racing on the same key both compute and store the same decision; the
/// second write simply replaces an equal value.
#[derive(Default)]
pub struct MatchCache {
    entries: RwLock<HashMap<PairKey, MatchDecision>>,
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PairKey) -> Option<MatchDecision> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn insert(&self, key: PairKey, decision: MatchDecision) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, decision);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
