//! Cardioscope Dev Server
//!
//! Run with: cargo run --bin cardioscope-server
//!
//! Serves the built frontend and forwards `/api/*` to the analysis backend.
//!
//! # Configuration
//!
//! Read from the first config file found (`--config`, then
//! `~/.config/cardioscope/config.toml`, `/etc/cardioscope/config.toml`,
//! `./config.toml`). Environment variables override it:
//! - `CARDIOSCOPE_HOST`, `CARDIOSCOPE_PORT`: bind address (default: 0.0.0.0:5173)
//! - `CARDIOSCOPE_STATIC_DIR`: built UI (default: ./cardioscope-ui/dist)
//! - `CARDIOSCOPE_BACKEND_URL`: backend origin (default: http://localhost:8080)
//! - `CARDIOSCOPE_LOG_LEVEL`, `CARDIOSCOPE_LOG_FORMAT`: logging
//! - `RUST_LOG`: overrides the log filter entirely

use cardioscope::config::Config;
use cardioscope::logging;
use cardioscope::server::{serve, AppState};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cardioscope-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dev server for the Cardioscope dashboard")]
struct Args {
    /// Config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Backend origin (overrides config)
    #[arg(long)]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::resolve(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = args.backend_url {
        config.backend.url = url;
    }

    logging::init(&config.logging);

    tracing::info!("Starting Cardioscope dev server v{}", env!("CARGO_PKG_VERSION"));

    if !std::path::Path::new(&config.server.static_dir).exists() {
        tracing::warn!(
            "Static directory {} does not exist; only /api and /health will answer",
            config.server.static_dir
        );
    }

    let state = AppState::new(config.server.clone(), &config.backend)?;
    serve(state).await?;

    tracing::info!("Cardioscope dev server stopped");
    Ok(())
}
