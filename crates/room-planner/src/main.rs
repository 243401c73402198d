//! Room Planner entry point.
//!
//! Runs a headless front end: one JSON request per stdin line, one JSON
//! response per stdout line.  Logs go to stderr so stdout stays a clean
//! response stream.
//!
//! ```text
//! main()
//!  ├─ load config         (--config or platform config dir)
//!  ├─ --write-config      (write the effective config and exit)
//!  ├─ FileLayoutRepository (--storage-dir or [persistence].storage_dir)
//!  ├─ AppState::from_config
//!  └─ request loop        (until EOF or Ctrl-C)
//! ```
//!
//! Example session:
//!
//! ```bash
//! echo '{"command":"catalog"}' | room-planner --storage-dir ./layouts
//! room-planner --config ./planner.toml --write-config
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use room_planner::infrastructure::storage::config::{
    config_file_path, load_config_from, save_config_to,
};
use room_planner::infrastructure::storage::layout_files::FileLayoutRepository;
use room_planner::infrastructure::ui_bridge::{handle_line, AppState};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Interactive room-layout engine with a JSON-lines front-end protocol.
#[derive(Debug, Parser)]
#[command(name = "room-planner", version)]
struct Cli {
    /// Path to the TOML config file.  Defaults to the platform config dir.
    #[arg(long, env = "ROOM_PLANNER_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for saved layouts.  Overrides `[persistence].storage_dir`.
    #[arg(long, env = "ROOM_PLANNER_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Write the effective config (defaults filled in) to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config_file_path().context("resolving config file path")?,
    };
    let config = load_config_from(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.planner.log_level)),
        )
        .init();

    if cli.write_config {
        save_config_to(&config_path, &config)
            .with_context(|| format!("writing config to {}", config_path.display()))?;
        info!(config = %config_path.display(), "config written");
        return Ok(());
    }

    let storage_dir = match cli.storage_dir {
        Some(dir) => dir,
        None => config
            .persistence
            .resolve_storage_dir()
            .context("resolving layout storage directory")?,
    };
    let repository = Arc::new(FileLayoutRepository::new(storage_dir.clone()));
    let state = AppState::from_config(&config, repository).context("starting session")?;

    info!(
        config = %config_path.display(),
        config_version = %config.planner.version,
        storage = %storage_dir.display(),
        "Room Planner ready"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("reading request")?,
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(Arc::clone(&state), &line).await;
        let mut text = serde_json::to_string(&response).context("encoding response")?;
        text.push('\n');
        stdout
            .write_all(text.as_bytes())
            .await
            .context("writing response")?;
        stdout.flush().await.context("flushing response")?;
    }

    info!("Room Planner stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
