//! FAQ Assist - FAQ answering web backend
//!
//! # Usage
//!
//! ```bash
//! # Serve the chat UI and API on the configured address
//! faq-assist --faq data/faq.json
//!
//! # One-shot question on the terminal
//! faq-assist ask "I forgot my password"
//!
//! # Validate config and knowledge base
//! faq-assist check
//! ```
//!
//! # Environment Variables
//!
//! - `FAQ_ASSIST_CONFIG`: Path to the TOML config file (default: `./faq_assist.toml`)
//! - `OPENAI_API_KEY`: Provider key when `[llm] enabled = true` (name configurable)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use faq_assist::api::create_app;
use faq_assist::config::{defaults, AssistConfig};
use faq_assist::knowledge_base::{watcher, JsonFileSource, KnowledgeStore};
use faq_assist::llm;
use faq_assist::AssistService;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "faq-assist")]
#[command(about = "FAQ answering backend with fuzzy, vector and keyword matching")]
#[command(version)]
struct CliArgs {
    /// Config file (overrides FAQ_ASSIST_CONFIG and ./faq_assist.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the server address (default: "127.0.0.1:5000")
    #[arg(short, long)]
    addr: Option<String>,

    /// Override the FAQ records file
    #[arg(long)]
    faq: Option<PathBuf>,

    /// Override the sample questions file
    #[arg(long)]
    samples: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Run the HTTP server (default)
    Serve,

    /// Answer one question through the matching cascade and exit
    Ask {
        /// The question text
        question: String,
    },

    /// Print suggestions for a partial question and exit
    Suggest {
        /// The typed prefix
        prefix: String,
    },

    /// Load and validate the config and knowledge base, then exit
    Check,
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(args: &CliArgs) -> Result<AssistConfig> {
    let mut config = match &args.config {
        Some(path) => AssistConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AssistConfig::load(),
    };

    if let Some(addr) = &args.addr {
        config.server.addr.clone_from(addr);
    }
    if let Some(faq) = &args.faq {
        config.knowledge_base.faq_path.clone_from(faq);
    }
    if let Some(samples) = &args.samples {
        config.knowledge_base.samples_path = Some(samples.clone());
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn open_store(config: &AssistConfig) -> Result<Arc<KnowledgeStore>> {
    let kb = &config.knowledge_base;
    let source = JsonFileSource::new(kb.faq_path.clone(), kb.samples_path.clone());
    let store = KnowledgeStore::open(Box::new(source))
        .with_context(|| format!("Failed to load knowledge base {}", kb.faq_path.display()))?;
    Ok(Arc::new(store))
}

// ============================================================================
// Server
// ============================================================================

async fn serve(config: AssistConfig, store: Arc<KnowledgeStore>) -> Result<()> {
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let kb_config = config.knowledge_base.clone();
    let watcher_handle = if kb_config.watch && !kb_config.reload_per_request {
        Some(tokio::spawn(watcher::run_watcher(
            Arc::clone(&store),
            Duration::from_secs(kb_config.watch_interval_secs),
            Duration::from_millis(defaults::WATCH_DEBOUNCE_MS),
            cancel_token.clone(),
        )))
    } else {
        None
    };

    let backend = llm::backend_from_config(&config.llm);
    let server_addr = config.server.addr.clone();
    let service = AssistService::new(config, store, backend).with_cancellation(cancel_token.clone());
    let app = create_app(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {server_addr}"))?;
    info!("HTTP server listening on {}", server_addr);
    info!("Chat UI available at: http://{}", server_addr);

    let shutdown = cancel_token.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            info!("[HttpServer] Received shutdown signal");
        })
        .await
        .context("HTTP server error")?;

    cancel_token.cancel();
    if let Some(handle) = watcher_handle {
        if let Err(e) = handle.await {
            warn!(error = %e, "Knowledge base watcher task failed");
        }
    }
    info!("FAQ Assist shutdown complete");
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let config = load_config(&args)?;
    let store = open_store(&config)?;

    match args.command.unwrap_or(SubCommand::Serve) {
        SubCommand::Serve => serve(config, store).await,
        SubCommand::Ask { question } => {
            let backend = llm::backend_from_config(&config.llm);
            let service = AssistService::new(config, store, backend);
            let answer = service.chat(&question).await;
            println!("[{}] {}", answer.source, answer.answer);
            Ok(())
        }
        SubCommand::Suggest { prefix } => {
            let service = AssistService::new(config, store, Arc::new(llm::DisabledBackend));
            for suggestion in service.suggest(&prefix) {
                println!("{suggestion}");
            }
            Ok(())
        }
        SubCommand::Check => {
            let stats = store.snapshot().stats();
            println!("config: ok");
            println!("knowledge base: {}", store.source_name());
            println!("  entries: {}", stats.entries);
            println!("  samples: {}", stats.samples);
            if stats.keywordless_entries > 0 {
                println!("  entries without keywords: {}", stats.keywordless_entries);
            }
            Ok(())
        }
    }
}
