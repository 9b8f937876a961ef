use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::errors::EmbeddingError;
use crate::models::config::ModelChoice;
use crate::processing::single_flight::SingleFlight;

/// Maps a text to a fixed-length vector.
///
/// Implementations return L2-normalized vectors, so the dot product of two
/// outputs is their cosine similarity.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Normalize a vector to unit length.
///
/// Returns the original vector when the norm is zero.
pub fn normalize_embedding(vec: &[f32]) -> Vec<f32> {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        vec.to_vec()
    } else {
        vec.iter().map(|x| x / norm).collect()
    }
}

/// Dot product of two equally sized vectors.
pub fn dot_product(a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

type ModelHandle = Arc<Mutex<TextEmbedding>>;

/// [`Embedder`] backed by a local `fastembed` model.
///
/// Loading the model downloads and parses ONNX weights, so it is deferred to
/// the first `embed` call and guarded by a [`SingleFlight`]: concurrent first
/// calls wait on one load, a failed load is retried by the next call, and a
/// loaded model is kept until the embedder is dropped.
pub struct FastEmbedder {
    model: ModelChoice,
    show_download_progress: bool,
    handle: SingleFlight<ModelHandle, EmbeddingError>,
}

static PROCESS_EMBEDDER: OnceLock<Arc<FastEmbedder>> = OnceLock::new();

impl FastEmbedder {
    pub fn new(model: ModelChoice, show_download_progress: bool) -> Self {
        Self {
            model,
            show_download_progress,
            handle: SingleFlight::new(),
        }
    }

    /// The process-wide embedder. The first call fixes the model; later calls
    /// asking for a different one get the existing embedder.
    pub fn process_wide(model: ModelChoice, show_download_progress: bool) -> Arc<FastEmbedder> {
        let embedder = PROCESS_EMBEDDER
            .get_or_init(|| Arc::new(FastEmbedder::new(model, show_download_progress)));
        if embedder.model != model {
            log::warn!(
                "Embedder already created with {}; ignoring request for {}",
                embedder.model.as_str(),
                model.as_str()
            );
        }
        Arc::clone(embedder)
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.is_ready()
    }

    async fn model_handle(&self) -> Result<ModelHandle, EmbeddingError> {
        let model = self.model;
        let show_download_progress = self.show_download_progress;
        self.handle
            .get_or_init(move || load_model(model, show_download_progress))
            .await
    }
}

async fn load_model(
    model: ModelChoice,
    show_download_progress: bool,
) -> Result<ModelHandle, EmbeddingError> {
    log::info!(
        "Initializing embedding model {} (this happens once)",
        model.as_str()
    );
    let loaded = tokio::task::spawn_blocking(move || {
        TextEmbedding::try_new(
            InitOptions::new(fastembed_model(model))
                .with_show_download_progress(show_download_progress),
        )
    })
    .await
    .map_err(|error| EmbeddingError::Init(error.to_string()))?;

    match loaded {
        Ok(embedding) => {
            log::info!("Embedding model {} loaded", model.as_str());
            Ok(Arc::new(Mutex::new(embedding)))
        }
        Err(error) => {
            log::error!("Failed to initialize embedder {}: {error:?}", model.as_str());
            Err(EmbeddingError::Init(format!("{error:?}")))
        }
    }
}

fn fastembed_model(model: ModelChoice) -> EmbeddingModel {
    match model {
        ModelChoice::AllMiniLmL6V2 => EmbeddingModel::AllMiniLML6V2,
        ModelChoice::BgeSmallEnV15 => EmbeddingModel::BGESmallENV15,
        ModelChoice::MultilingualE5Large => EmbeddingModel::MultilingualE5Large,
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let handle = self.model_handle().await?;
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            let mut embedder = handle
                .lock()
                .map_err(|_| EmbeddingError::Compute("embedding model lock poisoned".to_string()))?;
            embedder
                .embed(vec![text], None)
                .map_err(|error| EmbeddingError::Compute(format!("{error:?}")))?
                .into_iter()
                .next()
                .map(|value| normalize_embedding(&value))
                .ok_or_else(|| EmbeddingError::Compute("model returned no embedding".to_string()))
        })
        .await
        .map_err(|error| EmbeddingError::Compute(error.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_embedding_produces_unit_vectors() {
        let normalized = normalize_embedding(&[3.0, 4.0]);
        assert!((normalized[0] - 0.6).abs() < 1e-6);
        assert!((normalized[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn normalize_embedding_keeps_zero_vector() {
        assert_eq!(normalize_embedding(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn dot_product_of_unit_vectors_is_cosine() {
        let a = normalize_embedding(&[1.0, 1.0, 0.0]);
        let b = normalize_embedding(&[1.0, 0.0, 0.0]);
        let score = dot_product(&a, &b).expect("same dimensions");
        assert!((score - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn dot_product_rejects_mismatched_dimensions() {
        assert_eq!(
            dot_product(&[1.0, 0.0], &[1.0]),
            Err(EmbeddingError::DimensionMismatch { left: 2, right: 1 })
        );
    }

    #[test]
    fn embedder_is_not_loaded_before_first_use() {
        let embedder = FastEmbedder::new(ModelChoice::default(), false);
        assert!(!embedder.is_loaded());
    }
}
