//! Provider implementations for docmind.
//!
//! All providers implement the `docmind_core::Provider` trait. The only
//! shipped backend is Ollama through its OpenAI-compatible endpoints, which
//! covers both chat completion (the LLM client) and embedding (the
//! embedding client) with one HTTP surface.

pub mod ollama;

pub use ollama::OllamaProvider;
