//! Built-in tool implementations for docmind.
//!
//! The tool set is closed and fixed at startup: two arithmetic helpers and
//! document retrieval. There is no dynamic loading; anything the agent can
//! do is visible in this crate.

pub mod arithmetic;
pub mod retrieve;

use std::sync::Arc;

use docmind_core::{Provider, ToolRegistry};
use docmind_index::VectorSearch;

pub use arithmetic::{AddTool, MultiplyTool};
pub use retrieve::RetrieveTool;

/// Create the default tool registry: `add`, `multiply`, and `retrieve`.
///
/// The retrieval tool shares the vector index and embedding provider with
/// the rest of the application, so the registry must be built after
/// ingestion has produced the index.
pub fn default_registry(
    search: Arc<dyn VectorSearch>,
    embedder: Arc<dyn Provider>,
    embedding_model: impl Into<String>,
    k: usize,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(AddTool));
    registry.register(Box::new(MultiplyTool));
    registry.register(Box::new(RetrieveTool::new(search, embedder, embedding_model, k)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docmind_core::{
        EmbeddingRequest, EmbeddingResponse, ProviderError, ProviderRequest, ProviderResponse,
    };
    use docmind_index::{Similarity, VectorIndex};

    struct NoopEmbedder;

    #[async_trait]
    impl Provider for NoopEmbedder {
        fn name(&self) -> &str {
            "noop"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::NotConfigured("test".into()))
        }

        async fn embed(
            &self,
            request: EmbeddingRequest,
        ) -> Result<EmbeddingResponse, ProviderError> {
            Ok(EmbeddingResponse {
                embeddings: vec![vec![1.0]; request.inputs.len()],
                model: request.model,
            })
        }
    }

    #[test]
    fn default_registry_has_the_closed_tool_set() {
        let registry = default_registry(
            Arc::new(VectorIndex::new(Similarity::Cosine)),
            Arc::new(NoopEmbedder),
            "test-embed",
            2,
        );
        let mut names = registry.names();
        names.sort_unstable();
        assert_eq!(names, vec!["add", "multiply", "retrieve"]);
    }
}
