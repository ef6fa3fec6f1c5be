//! Retrieval tool — similarity search over the document index.
//!
//! Embeds the model's query through the configured embedding provider,
//! then searches the shared vector index and returns the top-k passages
//! as pretty-printed JSON so the model can cite sources and offsets.

use std::sync::Arc;

use async_trait::async_trait;
use docmind_core::{EmbeddingRequest, Provider, Tool, ToolError};
use docmind_index::VectorSearch;
use serde::Serialize;
use tracing::debug;

pub struct RetrieveTool {
    search: Arc<dyn VectorSearch>,
    embedder: Arc<dyn Provider>,
    embedding_model: String,
    k: usize,
}

/// One retrieved passage as presented to the model.
#[derive(Serialize)]
struct RetrievedPassage<'a> {
    source: &'a str,
    start: usize,
    end: usize,
    score: f32,
    text: &'a str,
}

impl RetrieveTool {
    pub fn new(
        search: Arc<dyn VectorSearch>,
        embedder: Arc<dyn Provider>,
        embedding_model: impl Into<String>,
        k: usize,
    ) -> Self {
        Self {
            search,
            embedder,
            embedding_model: embedding_model.into(),
            k,
        }
    }
}

#[async_trait]
impl Tool for RetrieveTool {
    fn name(&self) -> &str {
        "retrieve"
    }

    fn description(&self) -> &str {
        "Search the ingested documents for passages relevant to a query. \
         Returns the most similar passages with their source and offsets."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to find relevant passages"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        let request = EmbeddingRequest {
            model: self.embedding_model.clone(),
            inputs: vec![query.to_string()],
        };
        let response =
            self.embedder
                .embed(request)
                .await
                .map_err(|source| ToolError::Upstream {
                    tool_name: "retrieve".into(),
                    source,
                })?;
        let embedding = response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| ToolError::Upstream {
                tool_name: "retrieve".into(),
                source: docmind_core::ProviderError::InvalidResponse(
                    "Embedding response contained no vectors".into(),
                ),
            })?;

        let scored = self
            .search
            .search(&embedding, self.k)
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "retrieve".into(),
                reason: e.to_string(),
            })?;
        debug!(query, results = scored.len(), "Retrieval search complete");

        if scored.is_empty() {
            return Ok("No relevant passages found in the index.".to_string());
        }

        let passages: Vec<RetrievedPassage<'_>> = scored
            .iter()
            .map(|s| RetrievedPassage {
                source: &s.chunk.metadata.source,
                start: s.chunk.start,
                end: s.chunk.end,
                score: s.score,
                text: &s.chunk.text,
            })
            .collect();
        serde_json::to_string_pretty(&passages).map_err(|e| ToolError::ExecutionFailed {
            tool_name: "retrieve".into(),
            reason: e.to_string(),
        })
    }
}
