//! Helpers for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use product_matcher::errors::EmbeddingError;
use product_matcher::processing::embedding::{Embedder, normalize_embedding};

const DIMENSIONS: usize = 256;

/// Bag-of-words embedder over alphabetic tokens.
///
/// Digits are ignored, so titles differing only in model numbers embed
/// identically and reach the numeric rule. Every distinct token gets its own
/// dimension, so there are no hash collisions between tokens.
#[derive(Default)]
pub struct StubEmbedder {
    calls: AtomicUsize,
    dimensions: Mutex<HashMap<String, usize>>,
}

impl StubEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let mut dimensions = self.dimensions.lock().expect("dimension table poisoned");
        let mut vector = vec![0.0_f32; DIMENSIONS];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphabetic())
            .filter(|token| !token.is_empty())
        {
            let next = dimensions.len();
            let index = *dimensions.entry(token.to_string()).or_insert(next);
            if index >= DIMENSIONS {
                let message = "stub vocabulary exhausted".to_string();
                return Err(EmbeddingError::Compute(message));
            }
            vector[index] = 1.0;
        }
        Ok(normalize_embedding(&vector))
    }
}

/// Always fails, counting attempts.
#[derive(Default)]
pub struct FailingEmbedder {
    calls: AtomicUsize,
}

impl FailingEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EmbeddingError::Init("model weights unavailable".to_string()))
    }
}
