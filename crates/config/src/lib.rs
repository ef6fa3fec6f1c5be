//! Configuration loading, validation, and management for docmind.
//!
//! Loads configuration from `docmind.toml` (or a path given on the command
//! line) with environment variable overrides, and validates all settings
//! before any work begins. Validation failures are fatal at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure. Maps directly to `docmind.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory scanned recursively for `.txt` documents
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Ollama endpoint and generation settings
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Chunking settings
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Retrieval settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Agent loop settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Ingestion settings
    #[serde(default)]
    pub ingestion: IngestionConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chat model
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding model
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Per-call timeout in seconds for chat and embedding requests
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:11434".into()
}
fn default_model() -> String {
    "llama3.1:8b".into()
}
fn default_embedding_model() -> String {
    "nomic-embed-text".into()
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            embedding_model: default_embedding_model(),
            temperature: 0.0,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive windows in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_chunk_size() -> usize {
    1000
}
fn default_chunk_overlap() -> usize {
    200
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// How many chunks the retrieve tool returns
    #[serde(default = "default_k")]
    pub k: usize,

    /// Similarity mode for ranking
    #[serde(default)]
    pub similarity: SimilarityMode,
}

fn default_k() -> usize {
    2
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            similarity: SimilarityMode::default(),
        }
    }
}

/// How stored vectors are scored against a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMode {
    /// Cosine similarity (higher = more relevant)
    #[default]
    Cosine,
    /// Dot product, for pre-normalized embeddings
    DotProduct,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// The system persona seeded as the first transcript message
    #[serde(default = "default_persona")]
    pub system_persona: String,

    /// Maximum model calls per turn (safety limit; must be > 0)
    #[serde(default = "default_max_model_calls")]
    pub max_model_calls: u32,
}

fn default_persona() -> String {
    "You are an assistant that answers questions based on the available \
     documents and gives clear, concise answers."
        .into()
}
fn default_max_model_calls() -> u32 {
    8
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_persona: default_persona(),
            max_model_calls: default_max_model_calls(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// When true, an unreadable document file aborts ingestion instead of
    /// being skipped with a warning.
    #[serde(default)]
    pub strict: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self { strict: false }
    }
}

impl AppConfig {
    /// Load configuration from the default path (`docmind.toml` in the
    /// working directory), falling back to defaults if it does not exist.
    ///
    /// Environment variables override file values:
    /// - `DOCMIND_DATA_DIR`
    /// - `OLLAMA_BASE_URL`, `OLLAMA_MODEL`, `OLLAMA_EMBEDDING_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(Path::new("docmind.toml"))?;

        if let Ok(dir) = std::env::var("DOCMIND_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(url) = std::env::var("OLLAMA_BASE_URL") {
            config.ollama.base_url = url;
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            config.ollama.model = model;
        }
        if let Ok(model) = std::env::var("OLLAMA_EMBEDDING_MODEL") {
            config.ollama.embedding_model = model;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration. Surfaced before any work begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunking.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "chunk_size must be greater than 0".into(),
            ));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(ConfigError::ValidationError(
                "chunk_overlap must be smaller than chunk_size".into(),
            ));
        }
        if self.retrieval.k == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval k must be at least 1".into(),
            ));
        }
        if self.agent.max_model_calls == 0 {
            return Err(ConfigError::ValidationError(
                "max_model_calls must be at least 1".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.ollama.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            ollama: OllamaConfig::default(),
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            agent: AgentConfig::default(),
            ingestion: IngestionConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
