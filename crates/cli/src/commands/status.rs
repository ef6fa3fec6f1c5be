//! `docmind status` — Show configuration and backend health.

use docmind_config::AppConfig;
use docmind_core::Provider;
use docmind_index::load_documents;

pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("docmind status");
    println!("==============");
    println!();
    println!("Ollama");
    println!("  base_url:        {}", config.ollama.base_url);
    println!("  model:           {}", config.ollama.model);
    println!("  embedding_model: {}", config.ollama.embedding_model);
    println!("  timeout:         {}s", config.ollama.timeout_secs);

    let provider = super::build_provider(&config)?;
    let health = match provider.health_check().await {
        Ok(true) => "reachable".to_string(),
        Ok(false) => "unreachable".to_string(),
        Err(e) => format!("unreachable ({e})"),
    };
    println!("  health:          {health}");

    println!();
    println!("Corpus");
    println!("  data_dir:        {}", config.data_dir.display());
    match load_documents(&config.data_dir, false) {
        Ok(docs) => {
            let chars: usize = docs.iter().map(|d| d.text.chars().count()).sum();
            println!("  documents:       {}", docs.len());
            println!("  characters:      {chars}");
        }
        Err(e) => println!("  documents:       unavailable ({e})"),
    }

    println!();
    println!("Pipeline");
    println!(
        "  chunking:        {} chars, {} overlap",
        config.chunking.chunk_size, config.chunking.chunk_overlap
    );
    println!(
        "  retrieval:       top-{}, {:?}",
        config.retrieval.k, config.retrieval.similarity
    );
    println!("  call budget:     {} model calls/turn", config.agent.max_model_calls);
    println!("  strict ingest:   {}", config.ingestion.strict);
    println!();

    Ok(())
}
