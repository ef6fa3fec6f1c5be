//! Vector similarity scoring.
//!
//! Pure-Rust cosine similarity and dot product over `f32` slices, with the
//! accumulation done in `f64` to keep long vectors numerically stable.

use serde::{Deserialize, Serialize};

/// How stored vectors are scored against a query. Higher is more relevant
/// in both modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Similarity {
    #[default]
    Cosine,
    /// For embeddings that are already L2-normalized.
    DotProduct,
}

impl Similarity {
    pub fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Similarity::Cosine => cosine_similarity(a, b),
            Similarity::DotProduct => dot_product(a, b),
        }
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical direction, 0 = orthogonal.
/// Returns 0.0 if either vector is zero-length or empty.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Plain dot product. Returns 0.0 on mismatched lengths.
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum::<f64>() as f32
}
