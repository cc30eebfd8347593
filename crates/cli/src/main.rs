//! PaperChat CLI — the main entry point.
//!
//! Commands:
//! - `chat`        — Interactive chat or single-message mode
//! - `search`      — One-shot arXiv paper search
//! - `paper`       — Fetch and print arXiv paper metadata
//! - `config-init` — Write a config template with a placeholder key

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "paperchat",
    about = "PaperChat — a Gemini-backed chat companion with arXiv paper search",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Search arXiv for papers on a topic
    Search {
        /// Free-text topic
        topic: String,

        /// Maximum number of results
        #[arg(short = 'n', long, default_value_t = 5)]
        max_results: usize,
    },

    /// Fetch metadata for one arXiv paper
    Paper {
        /// arXiv URL or bare identifier (e.g. 2301.01234)
        reference: String,
    },

    /// Write a config template to ~/.paperchat/config.toml
    ConfigInit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Search { topic, max_results } => {
            commands::search::run(&topic, max_results).await?
        }
        Commands::Paper { reference } => commands::paper::run(&reference).await?,
        Commands::ConfigInit => commands::config_init::run()?,
    }

    Ok(())
}
