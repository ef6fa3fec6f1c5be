//! Error types for the docmind domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! Severity policy:
//! - `Config` and `Index`/`Ingest` errors are fatal: they abort startup or
//!   index construction.
//! - `Tool` errors are turn-local and non-fatal: the registry folds them into
//!   a `ToolResult` so the model can react. The one exception is
//!   `ToolError::Upstream`, which terminates the turn like a provider error.
//! - `Provider` and `Agent` errors terminate the current turn and are
//!   reported to the caller.

use thiserror::Error;

/// The top-level error type for all docmind operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Vector index errors ---
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    // --- Ingestion errors ---
    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Agent loop errors ---
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Request timed out after {timeout_secs}s: {operation}")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

#[derive(Debug, Clone, Error)]
pub enum IndexError {
    #[error("Dimension mismatch: index holds {expected}-dim vectors, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Count mismatch: {chunks} chunks but {embeddings} embeddings")]
    CountMismatch { chunks: usize, embeddings: usize },
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Embedding failed for documents [{}]: {reason}", documents.join(", "))]
    EmbeddingFailed {
        documents: Vec<String>,
        reason: String,
    },

    #[error("Failed to read document {path}: {reason}")]
    UnreadableDocument { path: String, reason: String },

    #[error("Document source yielded no documents: {0}")]
    EmptyCorpus(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    /// An upstream service (embedding endpoint) failed inside a tool.
    /// Unlike the other variants this is fatal for the turn: the registry
    /// propagates it instead of folding it into a ToolResult.
    #[error("Upstream failure in tool {tool_name}: {source}")]
    Upstream {
        tool_name: String,
        #[source]
        source: ProviderError,
    },
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Tool-call budget of {budget} model calls exhausted without a final answer")]
    BudgetExhausted { budget: u32 },

    #[error("Run cancelled before the {state} step")]
    Cancelled { state: &'static str },
}
