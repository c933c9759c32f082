//! MindPrint - Privacy-preserving cognition distillation and persona rental
//!
//! Distills MEMORY.md/HISTORY.md into shareable cognition profiles with
//! automatic redaction, and manages the rental-token marketplace store.

use anyhow::Result;
use clap::{Parser, Subcommand};
use mindprint::{
    config::MindprintConfig,
    distill::{self, Distiller, CognitionWriter, DOCUMENT_DIR},
    market,
    rental::RentalService,
    store::PersonaStore,
    Error,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mindprint")]
#[command(author = "A3S Lab Team")]
#[command(version)]
#[command(about = "Distill memory into shareable cognition profiles with automatic redaction")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "MINDPRINT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Distill memory files into a cognition document
    Distill {
        /// Directory containing MEMORY.md / HISTORY.md (default: current)
        path: Option<PathBuf>,

        /// Output directory (default: .mindprint next to the sources)
        output_dir: Option<PathBuf>,
    },

    /// List cognition documents under a directory
    List {
        /// Directory to search (default: current)
        path: Option<PathBuf>,
    },

    /// Publish seller telemetry and the current cognition asset
    Sync {
        /// Workspace root (default: current)
        workspace: Option<PathBuf>,
    },

    /// Pull a rented persona by token
    Pull {
        /// Rental token (`namespace@opaque`)
        token: String,

        /// Workspace root to materialize under (default: current)
        workspace: Option<PathBuf>,
    },

    /// Issue a rental token for a seller (marketplace-side)
    Rent {
        /// Seller user id
        seller_user_id: String,

        /// Rental duration in hours (default: configured TTL)
        #[arg(long, conflicts_with = "no_expiry")]
        ttl_hours: Option<i64>,

        /// Issue a non-expiring token (discouraged)
        #[arg(long)]
        no_expiry: bool,
    },

    /// Revoke a rental token (idempotent)
    Revoke {
        /// Rental token (`namespace@opaque`)
        token: String,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mindprint={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = if let Some(config_path) = cli.config {
        let content = std::fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        MindprintConfig::default()
    };

    match cli.command {
        Commands::Distill { path, output_dir } => {
            run_distill(&config, path, output_dir).await?;
        }
        Commands::List { path } => {
            run_list(path)?;
        }
        Commands::Sync { workspace } => {
            run_sync(&config, workspace).await?;
        }
        Commands::Pull { token, workspace } => {
            run_pull(&config, &token, workspace).await?;
        }
        Commands::Rent {
            seller_user_id,
            ttl_hours,
            no_expiry,
        } => {
            run_rent(&config, &seller_user_id, ttl_hours, no_expiry).await?;
        }
        Commands::Revoke { token } => {
            run_revoke(&config, &token).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_distill(
    config: &MindprintConfig,
    path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let base = path.unwrap_or_else(|| PathBuf::from("."));
    let sources = match distill::load_sources(&base).await {
        Ok(sources) => sources,
        Err(Error::SourceNotFound) => {
            println!("No memory files found.");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let distiller = Distiller::new(
        config.distill.min_line_tokens,
        config.distill.max_bullets_per_section,
    );
    let outcome = distiller.distill(&sources)?;

    if outcome.redaction.total() > 0 {
        tracing::info!(redacted = %outcome.redaction.summary(), "identifying content removed");
    }

    let destination = output_dir.unwrap_or_else(|| base.join(DOCUMENT_DIR));
    let written = CognitionWriter::write(&outcome.profile, &destination).await?;
    println!("{}", written.display());
    Ok(())
}

fn run_list(path: Option<PathBuf>) -> Result<()> {
    let base = path.unwrap_or_else(|| PathBuf::from("."));
    let documents = market::find_documents(&base);

    if documents.is_empty() {
        println!("No cognition documents found in {}", base.display());
        return Ok(());
    }

    println!("Found {} cognition document(s):", documents.len());
    for doc in documents {
        match std::fs::read_to_string(&doc)
            .map_err(Error::from)
            .and_then(|text| distill::parse(&text))
        {
            Ok(profile) => println!(
                "  {} ({} bullets, model {})",
                doc.display(),
                profile.bullet_count(),
                profile.model_version
            ),
            Err(e) => println!("  {} (unreadable: {e})", doc.display()),
        }
    }
    Ok(())
}

fn user_id_opt(config: &MindprintConfig) -> Option<&str> {
    if config.user_id.is_empty() {
        None
    } else {
        Some(&config.user_id)
    }
}

async fn run_sync(config: &MindprintConfig, workspace: Option<PathBuf>) -> Result<()> {
    let workspace = workspace.unwrap_or_else(|| PathBuf::from("."));
    let store = PersonaStore::open(&config.store).await?;

    let report = market::sync_workspace(&store, &workspace, user_id_opt(config)).await?;
    println!(
        "Synced {} document(s) for seller {}",
        report.documents_found, report.user_id
    );
    Ok(())
}

async fn run_pull(
    config: &MindprintConfig,
    token: &str,
    workspace: Option<PathBuf>,
) -> Result<()> {
    let workspace = workspace.unwrap_or_else(|| PathBuf::from("."));
    let store = Arc::new(PersonaStore::open(&config.store).await?);
    let rentals = RentalService::new(store.clone(), config.rental.clone());

    match market::pull_persona(&store, &rentals, token, &workspace, user_id_opt(config)).await {
        Ok(path) => {
            println!("{}", path.display());
            Ok(())
        }
        // Token-state detail stays internal; the holder only learns that the
        // token did not work.
        Err(e) => Err(anyhow::anyhow!(e.user_message())),
    }
}

async fn run_rent(
    config: &MindprintConfig,
    seller_user_id: &str,
    ttl_hours: Option<i64>,
    no_expiry: bool,
) -> Result<()> {
    let store = Arc::new(PersonaStore::open(&config.store).await?);
    let rentals = RentalService::new(store, config.rental.clone());

    let ttl = if no_expiry {
        None
    } else {
        Some(chrono::Duration::hours(
            ttl_hours.unwrap_or(config.rental.default_ttl_hours),
        ))
    };

    let token = rentals.issue(seller_user_id, ttl).await?;
    println!("{token}");
    Ok(())
}

async fn run_revoke(config: &MindprintConfig, token: &str) -> Result<()> {
    let store = Arc::new(PersonaStore::open(&config.store).await?);
    let rentals = RentalService::new(store, config.rental.clone());

    rentals.revoke(token).await?;
    println!("Revoked.");
    Ok(())
}

fn show_config(config: Option<&MindprintConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{toml}");
    Ok(())
}
