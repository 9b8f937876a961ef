//! Configuration model loaded from external sources.

use std::path::Path;

use serde::Deserialize;

use crate::DEFAULT_SEMANTIC_THRESHOLD;
use crate::errors::ConfigError;

/// Name of the optional YAML file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "matcher";

/// Prefix for environment overrides, e.g. `MATCHER_SEMANTIC_THRESHOLD=0.8`.
pub const ENV_PREFIX: &str = "MATCHER";

#[derive(Clone, Debug, Deserialize)]
/// Raw settings as read from the file and environment layers.
pub struct MatcherSettings {
    pub semantic_threshold: f32,
    pub embedding_model: String,
    pub show_download_progress: bool,
}

impl MatcherSettings {
    /// Layers defaults, an optional YAML file and `MATCHER_*` variables.
    ///
    /// When `path` is `None` a `matcher.yaml` in the working directory is
    /// used if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .set_default("semantic_threshold", f64::from(DEFAULT_SEMANTIC_THRESHOLD))?
            .set_default("embedding_model", ModelChoice::default().as_str())?
            .set_default("show_download_progress", false)?
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn matcher_config(&self) -> Result<MatcherConfig, ConfigError> {
        MatcherConfig::new(self.semantic_threshold)
    }

    pub fn model_choice(&self) -> Result<ModelChoice, ConfigError> {
        ModelChoice::parse(&self.embedding_model)
    }
}

/// Validated knobs of the pairwise matcher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatcherConfig {
    semantic_threshold: f32,
}

impl MatcherConfig {
    pub fn new(semantic_threshold: f32) -> Result<Self, ConfigError> {
        if !(semantic_threshold > 0.0 && semantic_threshold <= 1.0) {
            return Err(ConfigError::Threshold(semantic_threshold));
        }
        Ok(Self { semantic_threshold })
    }

    pub fn semantic_threshold(&self) -> f32 {
        self.semantic_threshold
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            semantic_threshold: DEFAULT_SEMANTIC_THRESHOLD,
        }
    }
}

/// Sentence-embedding models the matcher knows how to load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModelChoice {
    #[default]
    AllMiniLmL6V2,
    BgeSmallEnV15,
    MultilingualE5Large,
}

impl ModelChoice {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_lowercase().as_str() {
            "all-minilm-l6-v2" => Ok(ModelChoice::AllMiniLmL6V2),
            "bge-small-en-v1.5" => Ok(ModelChoice::BgeSmallEnV15),
            "multilingual-e5-large" => Ok(ModelChoice::MultilingualE5Large),
            _ => Err(ConfigError::UnknownModel(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelChoice::AllMiniLmL6V2 => "all-minilm-l6-v2",
            ModelChoice::BgeSmallEnV15 => "bge-small-en-v1.5",
            ModelChoice::MultilingualE5Large => "multilingual-e5-large",
        }
    }
}
