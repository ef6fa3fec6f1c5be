//! Overlapping-window text chunker.
//!
//! Pure function over its inputs: identical input and parameters always
//! yield an identical, order-preserving sequence of chunks. Offsets are
//! character offsets, so multi-byte text is windowed correctly.

use docmind_core::{Chunk, Document, Error};

/// Split a document into overlapping windows of at most `chunk_size`
/// characters, advancing by `chunk_size - overlap` each step.
///
/// Preconditions (checked, `Error::Config` otherwise): `chunk_size > 0`
/// and `overlap < chunk_size`.
///
/// The final chunk may be shorter than `chunk_size`; chunking stops once a
/// window reaches the end of the document, and an empty document yields no
/// chunks at all.
pub fn split(document: &Document, chunk_size: usize, overlap: usize) -> Result<Vec<Chunk>, Error> {
    if chunk_size == 0 {
        return Err(Error::Config {
            message: "chunk_size must be greater than 0".into(),
        });
    }
    if overlap >= chunk_size {
        return Err(Error::Config {
            message: format!("overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"),
        });
    }

    let chars: Vec<char> = document.text.chars().collect();
    let total = chars.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let step = chunk_size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + chunk_size).min(total);
        chunks.push(Chunk {
            text: chars[start..end].iter().collect(),
            start,
            end,
            metadata: document.metadata.clone(),
        });
        if end == total {
            break;
        }
        start += step;
    }

    Ok(chunks)
}
