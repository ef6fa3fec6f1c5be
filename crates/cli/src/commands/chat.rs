//! `docmind chat` — Interactive or single-message chat mode.

use std::sync::Arc;

use docmind_agent::{AgentLoop, TurnOutput};
use docmind_config::AppConfig;
use docmind_core::{CancelToken, Transcript};
use docmind_tools::default_registry;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

pub async fn run(
    config: AppConfig,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (provider, index) = super::build_runtime(&config).await?;

    let tools = Arc::new(default_registry(
        index,
        provider.clone(),
        config.ollama.embedding_model.clone(),
        config.retrieval.k,
    ));
    let agent = AgentLoop::new(
        provider,
        &config.ollama.model,
        config.ollama.temperature,
        tools,
        &config.agent.system_persona,
        config.agent.max_model_calls,
    );

    if let Some(msg) = message {
        // Single message mode
        let out = take_turn(&agent, &Transcript::new(), &msg).await?;
        println!("{}", out.answer);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  docmind — document-grounded assistant");
    println!();
    println!("  Model:      {}", config.ollama.model);
    println!("  Embeddings: {}", config.ollama.embedding_model);
    println!("  Corpus:     {}", config.data_dir.display());
    println!("  Tools:      add, multiply, retrieve");
    println!();
    println!("  Type your question and press Enter.");
    println!("  Type 'exit' or 'quit' to leave; Ctrl+C cancels a running turn.");
    println!();

    let mut transcript = Transcript::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            println!("Bye!");
            break;
        }
        if line.is_empty() {
            prompt()?;
            continue;
        }

        match take_turn(&agent, &transcript, line).await {
            Ok(out) => {
                println!("\n{}\n", out.answer);
                // Commit the turn only on success; a failed turn leaves the
                // conversation exactly where it was.
                transcript = out.transcript;
            }
            Err(e) => {
                eprintln!("\nError: {e}\n");
            }
        }
        prompt()?;
    }

    info!(messages = transcript.len(), "Session ended");
    Ok(())
}

/// Run one turn, cancelling it if Ctrl+C arrives while it is in flight.
async fn take_turn(
    agent: &AgentLoop,
    transcript: &Transcript,
    text: &str,
) -> docmind_core::Result<TurnOutput> {
    let cancel = CancelToken::default();
    let turn = agent.run_turn(text, transcript, &cancel);
    tokio::pin!(turn);
    let finished = tokio::select! {
        out = &mut turn => Some(out),
        _ = tokio::signal::ctrl_c() => {
            cancel.cancel();
            None
        }
    };
    match finished {
        Some(out) => out,
        // The loop notices the token at its next step boundary.
        None => turn.await,
    }
}

pub(crate) fn prompt() -> std::io::Result<()> {
    use std::io::Write;
    print!("you > ");
    std::io::stdout().flush()
}
