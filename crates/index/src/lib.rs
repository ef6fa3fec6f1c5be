//! Retrieval subsystem for docmind: chunking, the in-memory vector index,
//! document loading, and the build-time ingestion pipeline.
//!
//! The index is built once, then shared read-only between concurrent agent
//! runs; there is no in-place mutation after ingestion (rebuild to refresh).

pub mod chunker;
pub mod loader;
pub mod pipeline;
pub mod similarity;
pub mod store;

pub use chunker::split;
pub use loader::load_documents;
pub use pipeline::{build_index, IndexOptions};
pub use similarity::{cosine_similarity, dot_product, Similarity};
pub use store::{ScoredChunk, VectorIndex, VectorSearch};
