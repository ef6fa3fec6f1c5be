//! Document and Chunk domain types.
//!
//! A `Document` is an immutable unit of ingested text; a `Chunk` is an
//! overlapping window derived from exactly one document. Chunks inherit
//! their document's source metadata so retrieval results stay traceable.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provenance carried from a document into every chunk derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Where the text came from (file path, URL, ...).
    pub source: String,

    /// Additional source-specific fields.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SourceMetadata {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// An immutable ingested document. Created at ingestion, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID.
    pub id: String,

    /// The full raw text.
    pub text: String,

    /// Provenance, inherited by every chunk.
    pub metadata: SourceMetadata,
}

impl Document {
    /// Create a document with a generated ID.
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            metadata: SourceMetadata::new(source),
        }
    }
}

/// An overlapping text window cut from one document.
///
/// `start` and `end` are character offsets into the source document text,
/// with `end - start <= chunk_size` (the final chunk may be shorter).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text.
    pub text: String,

    /// Character offset of the first character in the source document.
    pub start: usize,

    /// Character offset one past the last character.
    pub end: usize,

    /// Provenance inherited from the source document.
    pub metadata: SourceMetadata,
}

impl Chunk {
    /// Length of the chunk in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
