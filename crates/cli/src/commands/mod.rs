//! Command implementations plus the startup glue they share: config
//! loading, provider construction, and corpus ingestion.

pub mod chat;
pub mod search;
pub mod status;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use docmind_config::{AppConfig, ConfigError, SimilarityMode};
use docmind_core::IngestError;
use docmind_index::{build_index, load_documents, IndexOptions, Similarity, VectorIndex};
use docmind_providers::OllamaProvider;
use tracing::info;

pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(p) => AppConfig::load_from(p),
        None => AppConfig::load(),
    }
}

fn similarity(mode: SimilarityMode) -> Similarity {
    match mode {
        SimilarityMode::Cosine => Similarity::Cosine,
        SimilarityMode::DotProduct => Similarity::DotProduct,
    }
}

pub(crate) fn build_provider(
    config: &AppConfig,
) -> Result<Arc<OllamaProvider>, Box<dyn std::error::Error>> {
    let provider = OllamaProvider::new(
        &config.ollama.base_url,
        Duration::from_secs(config.ollama.timeout_secs),
    )?;
    Ok(Arc::new(provider))
}

/// Load the corpus and build the in-memory index. Fatal on an empty or
/// missing data directory and on any embedding failure.
pub(crate) async fn build_runtime(
    config: &AppConfig,
) -> Result<(Arc<OllamaProvider>, Arc<VectorIndex>), Box<dyn std::error::Error>> {
    let provider = build_provider(config)?;

    let documents = load_documents(&config.data_dir, config.ingestion.strict)?;
    if documents.is_empty() {
        return Err(IngestError::EmptyCorpus(config.data_dir.display().to_string()).into());
    }

    let options = IndexOptions {
        chunk_size: config.chunking.chunk_size,
        chunk_overlap: config.chunking.chunk_overlap,
        similarity: similarity(config.retrieval.similarity),
        embedding_model: config.ollama.embedding_model.clone(),
        ..IndexOptions::default()
    };
    let index = build_index(&documents, provider.as_ref(), &options).await?;
    info!(
        documents = documents.len(),
        chunks = index.len(),
        dimension = ?index.dimension(),
        "Index ready"
    );

    Ok((provider, Arc::new(index)))
}
