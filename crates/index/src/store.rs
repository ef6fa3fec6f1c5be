//! In-memory vector index.
//!
//! Brute-force linear scan, O(n·d) per query, sized for a corpus of
//! hundreds to low-thousands of chunks. Searching
//! goes through the `VectorSearch` trait so an approximate-nearest-neighbor
//! structure can be swapped in behind the same seam later.

use docmind_core::{Chunk, IndexError};
use tracing::debug;
use uuid::Uuid;

use crate::similarity::Similarity;

/// A chunk with its similarity score against a query (higher = more relevant).
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// The read seam over an index. Safe for concurrent reads.
pub trait VectorSearch: Send + Sync {
    /// Return up to `k` chunks ranked by descending similarity. Ties are
    /// broken by insertion order (earliest inserted wins). An empty index
    /// yields an empty result, not an error.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, IndexError>;
}

/// One stored (chunk, embedding) pair. Owned exclusively by the index and
/// immutable after insertion.
#[derive(Debug)]
struct IndexedVector {
    id: String,
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// An in-memory store of (vector, chunk) pairs with linear-scan search.
///
/// All embeddings in one index share a fixed dimensionality, locked in by
/// the first inserted vector.
#[derive(Debug)]
pub struct VectorIndex {
    entries: Vec<IndexedVector>,
    dimension: Option<usize>,
    similarity: Similarity,
}

impl VectorIndex {
    pub fn new(similarity: Similarity) -> Self {
        Self {
            entries: Vec::new(),
            dimension: None,
            similarity,
        }
    }

    /// Add (chunk, embedding) pairs, returning one generated id per pair.
    ///
    /// Fails with a dimension error when the two slices differ in length or
    /// when any embedding disagrees with the index's fixed dimensionality;
    /// nothing is inserted on failure. Duplicate pairs are stored as
    /// independent entries; there is no implicit dedup.
    pub fn add(
        &mut self,
        chunks: Vec<Chunk>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Vec<String>, IndexError> {
        if chunks.len() != embeddings.len() {
            return Err(IndexError::CountMismatch {
                chunks: chunks.len(),
                embeddings: embeddings.len(),
            });
        }

        let dimension = match (self.dimension, embeddings.first()) {
            (Some(d), _) => d,
            (None, Some(first)) => first.len(),
            (None, None) => return Ok(Vec::new()),
        };
        if let Some(bad) = embeddings.iter().find(|e| e.len() != dimension) {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }

        self.dimension = Some(dimension);
        let ids: Vec<String> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                let id = Uuid::new_v4().to_string();
                self.entries.push(IndexedVector {
                    id: id.clone(),
                    chunk,
                    embedding,
                });
                id
            })
            .collect();

        debug!(added = ids.len(), total = self.entries.len(), "Indexed chunks");
        Ok(ids)
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The fixed embedding dimensionality, once the first vector is stored.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Look up a stored chunk by the id `add` returned.
    pub fn get(&self, id: &str) -> Option<&Chunk> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.chunk)
    }
}

impl VectorSearch for VectorIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, IndexError> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let dimension = self.dimension.unwrap_or(0);
        if query.len() != dimension {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: self.similarity.score(&entry.embedding, query),
            })
            .collect();

        // Stable sort: equal scores keep insertion order, earliest first.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmind_core::SourceMetadata;

    fn chunk(text: &str) -> Chunk {
        Chunk {
            text: text.into(),
            start: 0,
            end: text.len(),
            metadata: SourceMetadata::new("test.txt"),
        }
    }

    fn index_with(pairs: Vec<(&str, Vec<f32>)>) -> VectorIndex {
        let mut index = VectorIndex::new(Similarity::Cosine);
        let (chunks, embeddings): (Vec<_>, Vec<_>) = pairs
            .into_iter()
            .map(|(t, e)| (chunk(t), e))
            .unzip();
        index.add(chunks, embeddings).unwrap();
        index
    }

    #[test]
    fn add_returns_one_id_per_pair() {
        let mut index = VectorIndex::new(Similarity::Cosine);
        let ids = index
            .add(
                vec![chunk("a"), chunk("b")],
                vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            )
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(index.get(&ids[0]).unwrap().text, "a");
    }

    #[test]
    fn count_mismatch_rejected() {
        let mut index = VectorIndex::new(Similarity::Cosine);
        let err = index
            .add(vec![chunk("a")], vec![vec![1.0], vec![2.0]])
            .unwrap_err();
        assert!(matches!(err, IndexError::CountMismatch { .. }));
    }

    #[test]
    fn first_inconsistent_vector_rejected() {
        let mut index = VectorIndex::new(Similarity::Cosine);
        index.add(vec![chunk("a")], vec![vec![1.0, 0.0]]).unwrap();
        let err = index
            .add(vec![chunk("b")], vec![vec![1.0, 0.0, 0.0]])
            .unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
        // Failed add inserts nothing.
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn mixed_dimensions_in_one_batch_rejected() {
        let mut index = VectorIndex::new(Similarity::Cosine);
        let err = index
            .add(
                vec![chunk("a"), chunk("b")],
                vec![vec![1.0, 0.0], vec![1.0]],
            )
            .unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { .. }));
        assert!(index.is_empty());
    }

    #[test]
    fn search_ranks_by_similarity() {
        let index = index_with(vec![
            ("orthogonal", vec![0.0, 1.0, 0.0]),
            ("identical", vec![1.0, 0.0, 0.0]),
            ("partial", vec![0.5, 0.5, 0.0]),
        ]);
        let results = index.search(&[1.0, 0.0, 0.0], 10).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].chunk.text, "identical");
        assert_eq!(results[1].chunk.text, "partial");
        assert_eq!(results[2].chunk.text, "orthogonal");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn search_returns_at_most_k() {
        let index = index_with(
            (0..10)
                .map(|i| ("entry", vec![1.0, i as f32 * 0.1]))
                .collect(),
        );
        let results = index.search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn search_fewer_than_k_entries() {
        let index = index_with(vec![("only", vec![1.0, 0.0])]);
        let results = index.search(&[1.0, 0.0], 5).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn search_empty_index_returns_empty() {
        let index = VectorIndex::new(Similarity::Cosine);
        let results = index.search(&[1.0, 0.0], 3).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn search_query_dimension_mismatch() {
        let index = index_with(vec![("a", vec![1.0, 0.0])]);
        let err = index.search(&[1.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { .. }));
    }

    #[test]
    fn ties_broken_by_insertion_order() {
        // Same embedding three times: all score identically.
        let index = index_with(vec![
            ("first", vec![1.0, 0.0]),
            ("second", vec![1.0, 0.0]),
            ("third", vec![1.0, 0.0]),
        ]);
        let results = index.search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(results[0].chunk.text, "first");
        assert_eq!(results[1].chunk.text, "second");
        assert_eq!(results[2].chunk.text, "third");
    }

    #[test]
    fn duplicate_inserts_are_independent_entries() {
        let mut index = VectorIndex::new(Similarity::Cosine);
        index
            .add(vec![chunk("dup")], vec![vec![1.0, 0.0]])
            .unwrap();
        index
            .add(vec![chunk("dup")], vec![vec![1.0, 0.0]])
            .unwrap();
        assert_eq!(index.len(), 2);
        let results = index.search(&[1.0, 0.0], 10).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn dot_product_mode_ranks_by_magnitude() {
        let mut index = VectorIndex::new(Similarity::DotProduct);
        index
            .add(
                vec![chunk("small"), chunk("large")],
                vec![vec![1.0, 0.0], vec![3.0, 0.0]],
            )
            .unwrap();
        let results = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results[0].chunk.text, "large");
    }
}
