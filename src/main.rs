//! # Memoria CLI (`memoria`)
//!
//! The `memoria` binary is the primary interface for Memoria. It provides
//! commands for archive initialization, manual capture, one-shot recall,
//! and starting the HTTP API server.
//!
//! ## Usage
//!
//! ```bash
//! memoria --config ./config/memoria.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `memoria init` | Create the JSON archive file |
//! | `memoria capture "<snippet>"` | Archive a manual snippet |
//! | `memoria recall --tag <tag>` | Recall items relevant to the current context |
//! | `memoria serve` | Start the HTTP API server |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the archive
//! memoria init --config ./config/memoria.toml
//!
//! # Capture a snippet with tags
//! memoria capture "Tokio tasks are cheap; spawn freely" --tag rust --tag async
//!
//! # Recall against the current context
//! memoria recall --tag rust --query "spawn"
//!
//! # Start the HTTP API
//! memoria serve --config ./config/memoria.toml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use memoria::capture::{capture_item, CaptureRequest};
use memoria::config;
use memoria::engine::RecallEngine;
use memoria::models::ContextQuery;
use memoria::server;
use memoria::store::{ContextSource, JsonArchiveStore, StaticContextSource};

/// Memoria — a context-aware knowledge archive with a relevance-ranked
/// recall engine.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/memoria.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "memoria",
    about = "Memoria — a context-aware knowledge archive with a relevance-ranked recall engine",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/memoria.toml`. Archive, cache, recall policy,
    /// and server settings are read from this file; every setting has a
    /// default, so a missing file is only an error for commands that need
    /// explicit configuration.
    #[arg(long, global = true, default_value = "./config/memoria.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the archive file.
    ///
    /// Creates the JSON archive (and parent directories) at the configured
    /// path. This command is idempotent — running it multiple times is safe.
    Init,

    /// Archive a manual snippet.
    ///
    /// Stores the snippet with a generated id and timestamp and invalidates
    /// the user's recall cache so the next recall sees it immediately.
    Capture {
        /// The snippet text to archive.
        input: String,

        /// Title for the captured item. Defaults to "Manual Capture".
        #[arg(long)]
        title: Option<String>,

        /// Topic tag (repeatable). Defaults to `capture, manual`.
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// User the item belongs to.
        #[arg(long, default_value = "anonymous")]
        user: String,
    },

    /// Recall archived items relevant to the current context.
    ///
    /// Scores every archived item against the given tags, query, and
    /// description, and prints the ranked matches with their reasons.
    /// When no `--tag` is given, the `[context].tags` from the config file
    /// are used instead.
    Recall {
        /// Context tag describing the current focus (repeatable).
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Free-text search phrase.
        #[arg(long)]
        query: Option<String>,

        /// Free-text project description.
        #[arg(long)]
        description: Option<String>,

        /// User whose archive to recall from.
        #[arg(long, default_value = "anonymous")]
        user: String,
    },

    /// Start the HTTP API server.
    ///
    /// Binds to the address configured in `[server].bind` and serves
    /// `/api/recall`, `/api/capture`, and `/health`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let cfg = if cli.config.exists() {
        config::load_config(&cli.config)?
    } else {
        config::Config::minimal()
    };

    match cli.command {
        Commands::Init => {
            let store = JsonArchiveStore::new(cfg.archive.path.clone());
            store.init()?;
            println!("Archive initialized at {}", store.path().display());
        }
        Commands::Capture {
            input,
            title,
            tags,
            user,
        } => {
            let store = JsonArchiveStore::new(cfg.archive.path.clone());
            let engine = RecallEngine::from_config(&cfg);
            let request = CaptureRequest { input, title, tags };
            let item = capture_item(&store, &engine, &user, &request)?;
            println!("Captured \"{}\" ({})", item.title, item.id);
        }
        Commands::Recall {
            tags,
            query,
            description,
            user,
        } => {
            let context_tags = if tags.is_empty() {
                let source = StaticContextSource::new(cfg.context.tags.clone());
                source.context_tags(&user).await?
            } else {
                tags
            };

            let engine = RecallEngine::from_config(&cfg);
            let context = ContextQuery {
                context_tags,
                description,
                query,
            };
            let result = engine.recall(&user, &context).await?;

            println!("{}", result.explanation);
            println!();
            for (i, m) in result.matches.iter().enumerate() {
                println!("{}. [{:.2}] {}", i + 1, m.relevance_score, m.title);
                println!("    reason: {}", m.match_reason);
                if !m.tags.is_empty() {
                    println!("    tags: {}", m.tags.join(", "));
                }
                println!("    source: {}", m.source);
                if let Some(ref url) = m.url {
                    println!("    url: {}", url);
                }
                println!("    id: {}", m.archive_item_id);
                println!();
            }
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
