//! Remote config observer daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────┐   fetch    ┌──────────────────────────────────────┐
//!   │ remote config│◀───────────│            ConfigObserver            │
//!   │   source     │───bytes───▶│  entries: app.yaml, db.toml, ...     │
//!   └──────────────┘            │  CRC-32 changed? ──▶ ConfigStore     │
//!                               │  every reload interval (background)  │
//!                               └──────────────────────────────────────┘
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config_observer::config::load_config;
use config_observer::lifecycle::signals::wait_for_shutdown_signal;
use config_observer::lifecycle::startup::{init_observability, start_observer};
use config_observer::observer::entry::fetch_once;

#[derive(Parser)]
#[command(name = "config-observer")]
#[command(about = "Keeps local configuration in sync with a remote config source", long_about = None)]
struct Cli {
    /// Settings file (TOML).
    #[arg(short, long, default_value = "observer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the configured files and keep them in sync until signalled
    Run,
    /// Fetch one file through the configured source and print it
    Fetch {
        /// File to fetch, e.g. app.yaml
        filename: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = load_config(&cli.config)?;

    match cli.command {
        Commands::Run => {
            init_observability(&settings.observability)?;
            tracing::info!(settings = ?cli.config, "config-observer v0.1.0 starting");

            let observer = start_observer(&settings).await?;
            tracing::info!(
                files = ?observer.filenames(),
                interval_secs = observer.reload_interval(),
                "Observer running"
            );

            wait_for_shutdown_signal().await?;
            tracing::info!("Shutdown signal received, stopping observer");
            observer.shutdown().await;
            tracing::info!("Shutdown complete");
        }
        Commands::Fetch { filename } => {
            let conf_path = settings
                .identity
                .resolve_conf_path(&settings.observer.conf_path);
            let source = settings.source.build(&settings.identity, &conf_path)?;

            let (fingerprint, store) = fetch_once(source.as_ref(), &filename).await?;

            let report = serde_json::json!({
                "file": filename,
                "source": source.name(),
                "fingerprint": fingerprint.to_string(),
                "document": store.snapshot().as_ref(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
