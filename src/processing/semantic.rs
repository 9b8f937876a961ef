use std::sync::Arc;

use crate::domain::decision::{MatchDecision, MatchMethod};
use crate::errors::EmbeddingError;
use crate::processing::embedding::{Embedder, dot_product};

/// Thresholded cosine similarity between two titles.
pub struct SemanticScorer {
    embedder: Arc<dyn Embedder>,
}

impl SemanticScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Cosine similarity of the two titles' embeddings, clamped to `[0, 1]`.
    pub async fn similarity(&self, title_a: &str, title_b: &str) -> Result<f32, EmbeddingError> {
        let (vector_a, vector_b) = futures::try_join!(
            self.embedder.embed(title_a),
            self.embedder.embed(title_b)
        )?;
        let score = dot_product(&vector_a, &vector_b)?;
        if !score.is_finite() {
            return Err(EmbeddingError::Compute(format!(
                "similarity is not a finite number: {score}"
            )));
        }
        Ok(score.clamp(0.0, 1.0))
    }

    /// Like [`SemanticScorer::similarity`] but folds failures into a
    /// non-match with score 0.
    pub async fn score(&self, title_a: &str, title_b: &str, threshold: f32) -> MatchDecision {
        match self.similarity(title_a, title_b).await {
            Ok(score) => semantic_decision(score, threshold),
            Err(error) => embedding_failure(&error),
        }
    }
}

pub(crate) fn semantic_decision(score: f32, threshold: f32) -> MatchDecision {
    if score >= threshold {
        MatchDecision::matched(
            score,
            MatchMethod::Semantic,
            format!("Semantic score {score:.3} >= threshold {threshold}"),
        )
    } else {
        MatchDecision::rejected(
            score,
            MatchMethod::Semantic,
            format!("Semantic score {score:.3} < threshold {threshold}"),
        )
    }
}

pub(crate) fn embedding_failure(error: &EmbeddingError) -> MatchDecision {
    log::error!("Semantic scoring unavailable: {error}");
    MatchDecision::rejected(0.0, MatchMethod::Semantic, error.to_string())
}
