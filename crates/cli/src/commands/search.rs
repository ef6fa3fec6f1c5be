//! `docmind search` — Query the index directly, without the agent.
//!
//! Useful for checking what the retrieve tool would see for a query:
//! the same embedding, the same ranking, no model in between.

use std::sync::Arc;

use docmind_config::AppConfig;
use docmind_core::{EmbeddingRequest, Error, Provider, ProviderError};
use docmind_index::{ScoredChunk, VectorIndex, VectorSearch};
use docmind_providers::OllamaProvider;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::chat::prompt;

pub async fn run(
    config: AppConfig,
    query: Option<String>,
    k: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (provider, index) = super::build_runtime(&config).await?;
    let k = k.unwrap_or(config.retrieval.k);
    let model = config.ollama.embedding_model.clone();

    if let Some(q) = query {
        let results = search_once(&provider, &index, &model, &q, k).await?;
        print_results(&results);
        return Ok(());
    }

    println!("Interactive search over {} chunks.", index.len());
    println!("Type a query and press Enter; 'exit' to leave.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }
        if line.is_empty() {
            prompt()?;
            continue;
        }
        match search_once(&provider, &index, &model, line, k).await {
            Ok(results) => print_results(&results),
            Err(e) => eprintln!("Error: {e}"),
        }
        prompt()?;
    }
    Ok(())
}

async fn search_once(
    provider: &Arc<OllamaProvider>,
    index: &Arc<VectorIndex>,
    model: &str,
    query: &str,
    k: usize,
) -> Result<Vec<ScoredChunk>, Error> {
    let response = provider
        .embed(EmbeddingRequest {
            model: model.to_string(),
            inputs: vec![query.to_string()],
        })
        .await?;
    let embedding = response.embeddings.into_iter().next().ok_or_else(|| {
        Error::Provider(ProviderError::InvalidResponse(
            "Embedding response contained no vectors".into(),
        ))
    })?;
    Ok(index.search(&embedding, k)?)
}

fn print_results(results: &[ScoredChunk]) {
    if results.is_empty() {
        println!("No results.");
        return;
    }
    for (rank, scored) in results.iter().enumerate() {
        println!(
            "{}. [{:.4}] {} ({}..{})",
            rank + 1,
            scored.score,
            scored.chunk.metadata.source,
            scored.chunk.start,
            scored.chunk.end
        );
        println!("   {}", preview(&scored.chunk.text, 200));
    }
    println!();
}

/// First `limit` characters on a single line.
fn preview(text: &str, limit: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .take(limit)
        .collect();
    if text.chars().count() > limit {
        format!("{flat}...")
    } else {
        flat
    }
}
