pub mod domain;
pub mod errors;
pub mod models;
pub mod processing;

/// Default cosine-similarity threshold for a semantic match.
pub const DEFAULT_SEMANTIC_THRESHOLD: f32 = 0.78;
