//! Build-time ingestion pipeline: documents → chunks → embeddings → index.
//!
//! The pipeline is sequential and fail-fast. Embedding failures abort the
//! whole build with an error naming the affected documents. No partial
//! index is ever returned, so the agent never serves an incomplete corpus.

use docmind_core::{Chunk, Document, EmbeddingRequest, Error, IngestError, Provider};
use tracing::{debug, info};

use crate::chunker::split;
use crate::similarity::Similarity;
use crate::store::VectorIndex;

/// Options controlling chunking and embedding during index construction.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Chunk window size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive windows.
    pub chunk_overlap: usize,
    /// Similarity mode for the resulting index.
    pub similarity: Similarity,
    /// Embedding model passed to the provider.
    pub embedding_model: String,
    /// How many chunk texts to embed per provider call.
    pub batch_size: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            similarity: Similarity::Cosine,
            embedding_model: "nomic-embed-text".into(),
            batch_size: 32,
        }
    }
}

/// Build a fresh `VectorIndex` over the given documents.
///
/// Chunks every document, embeds the chunk texts in batches via the
/// provider, and adds all (chunk, embedding) pairs to a new index. Any
/// embedding failure aborts the build with `IngestError::EmbeddingFailed`
/// naming the documents in the failing batch.
pub async fn build_index(
    documents: &[Document],
    embedder: &dyn Provider,
    options: &IndexOptions,
) -> Result<VectorIndex, Error> {
    info!(
        documents = documents.len(),
        chunk_size = options.chunk_size,
        overlap = options.chunk_overlap,
        "Building index"
    );

    let mut chunks: Vec<Chunk> = Vec::new();
    for document in documents {
        chunks.extend(split(document, options.chunk_size, options.chunk_overlap)?);
    }
    info!(chunks = chunks.len(), "Documents chunked");

    let mut index = VectorIndex::new(options.similarity);
    if chunks.is_empty() {
        return Ok(index);
    }

    for batch in chunks.chunks(options.batch_size.max(1)) {
        let inputs: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let response = embedder
            .embed(EmbeddingRequest {
                model: options.embedding_model.clone(),
                inputs,
            })
            .await
            .map_err(|e| IngestError::EmbeddingFailed {
                documents: batch_sources(batch),
                reason: e.to_string(),
            })?;

        if response.embeddings.len() != batch.len() {
            return Err(IngestError::EmbeddingFailed {
                documents: batch_sources(batch),
                reason: format!(
                    "expected {} embeddings, provider returned {}",
                    batch.len(),
                    response.embeddings.len()
                ),
            }
            .into());
        }

        debug!(batch = batch.len(), "Embedded chunk batch");
        index.add(batch.to_vec(), response.embeddings)?;
    }

    info!(vectors = index.len(), "Index built");
    Ok(index)
}

/// Distinct source names for the documents a batch of chunks came from,
/// in first-seen order.
fn batch_sources(batch: &[Chunk]) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for chunk in batch {
        if !sources.contains(&chunk.metadata.source) {
            sources.push(chunk.metadata.source.clone());
        }
    }
    sources
}
