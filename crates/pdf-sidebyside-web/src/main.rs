//! PDF Side-by-Side Web - upload two PDFs, download them merged side by side.

mod helpers;
mod routes;
mod state;
mod templates;

use anyhow::{Context, Result};
use clap::Parser;
use pdf_sidebyside_core::AppConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "pdf-sidebyside-web")]
#[command(author, version, about = "PDF Side-by-Side Web Server", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, env = "PDF_SIDEBYSIDE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(short, long, env = "PDF_SIDEBYSIDE_PORT", default_value = "3000")]
    port: u16,

    /// Config file path
    #[arg(short, long, env = "PDF_SIDEBYSIDE_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let config = match &args.config {
        Some(path) => AppConfig::from_file(path).context("Failed to load config file")?,
        None => AppConfig::load(),
    };
    config.validate().context("Invalid configuration")?;
    info!(
        "Serving {} (upload limit {} bytes per file)",
        config.output_filename, config.max_upload_bytes
    );

    let state = Arc::new(AppState::new(config));
    let app = routes::router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid listen address")?;
    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
