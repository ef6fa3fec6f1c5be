//! # docmind Core
//!
//! Domain types, traits, and error definitions for the docmind
//! document-grounded agent. This crate has **zero framework dependencies** —
//! it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two external collaborators — the LLM endpoint and the embedding
//! endpoint — are defined as one `Provider` trait here; implementations live
//! in `docmind-providers`. The same goes for `Tool`: built-ins live in
//! `docmind-tools`. This keeps the dependency graph clean (all crates depend
//! inward on core) and makes the agent loop trivially testable with scripted
//! providers.

pub mod cancel;
pub mod document;
pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use cancel::CancelToken;
pub use document::{Chunk, Document, SourceMetadata};
pub use error::{AgentError, Error, IndexError, IngestError, ProviderError, Result, ToolError};
pub use message::{Message, Role, Transcript};
pub use provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse,
    ToolDefinition, Usage,
};
pub use tool::{Tool, ToolCallRequest, ToolRegistry, ToolResult};
