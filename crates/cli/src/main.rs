//! docmind CLI — the main entry point.
//!
//! Commands:
//! - `chat`   — Interactive chat or single-message mode
//! - `search` — Query the document index directly, skipping the agent
//! - `status` — Show configuration and backend health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "docmind",
    about = "docmind — document-grounded assistant over local models",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to docmind.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Search the document index without going through the model
    Search {
        /// Run a single query instead of entering interactive mode
        query: Option<String>,

        /// Override how many passages to return
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Show configuration and backend health
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Chat { message } => commands::chat::run(config, message).await?,
        Commands::Search { query, k } => commands::search::run(config, query, k).await?,
        Commands::Status => commands::status::run(config).await?,
    }

    Ok(())
}
