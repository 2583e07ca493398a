//! PDF Side-by-Side CLI - combine two PDF documents into side-by-side spreads.

use anyhow::{Context, Result};
use clap::Parser;
use pdf_sidebyside_core::{AppConfig, Composer, Side, SourceDocument};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "pdf-sidebyside")]
#[command(author, version, about = "Combine two PDFs page by page, side by side", long_about = None)]
struct Args {
    /// PDF drawn on the left of every page (e.g. the original)
    #[arg(required = true)]
    left: PathBuf,

    /// PDF drawn on the right of every page (e.g. the translation)
    #[arg(required = true)]
    right: PathBuf,

    /// Output PDF file (default: configured output filename)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file path
    #[arg(short, long, env = "PDF_SIDEBYSIDE_CONFIG")]
    config: Option<PathBuf>,

    /// Write streams uncompressed
    #[arg(long)]
    no_compress: bool,

    /// PDF version for the output header (e.g. "1.7")
    #[arg(long)]
    pdf_version: Option<String>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// What a run produced.
#[derive(Debug, PartialEq, Eq)]
struct Summary {
    output: PathBuf,
    pages: usize,
    left_pages: usize,
    right_pages: usize,
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    // Override config with CLI arguments
    if args.no_compress {
        config.compress = false;
    }
    if let Some(version) = &args.pdf_version {
        config.pdf_version.clone_from(version);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn read_source(path: &Path, side: Side) -> Result<SourceDocument> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    SourceDocument::parse(&bytes, side)
        .with_context(|| format!("Failed to load PDF: {}", path.display()))
}

fn run(args: &Args) -> Result<Summary> {
    let config = load_config(args)?;

    info!("Loading PDFs: {} | {}", args.left.display(), args.right.display());
    let left = read_source(&args.left, Side::Left)?;
    let right = read_source(&args.right, Side::Right)?;
    info!(
        "Left has {} pages, right has {} pages",
        left.page_count(),
        right.page_count()
    );

    if left.page_count() != right.page_count() {
        warn!(
            "Page counts differ; only the first {} pages are combined",
            left.page_count().min(right.page_count())
        );
    }

    let composer = Composer::new(config.compose_options());
    let composed = composer
        .compose_documents(&left, &right)
        .context("Failed to combine pages")?;

    for page in composed.pages() {
        let size = page.size();
        debug!(
            "Page {}: {}x{} (left at y={}, right at x={} y={})",
            page.index + 1,
            size.width,
            size.height,
            page.layout.left.y,
            page.layout.right.x,
            page.layout.right.y
        );
    }

    let pages = composed.page_count();
    if pages == 0 {
        warn!("No page pairs to combine; writing an empty document");
    }

    let bytes = composed.to_bytes().context("Failed to serialize merged PDF")?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output_filename));
    std::fs::write(&output, bytes)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    Ok(Summary {
        output,
        pages,
        left_pages: left.page_count(),
        right_pages: right.page_count(),
    })
}

fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let summary = run(&args)?;

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!(
            "Merged {} page pairs into {}",
            summary.pages,
            summary.output.display()
        );
    }

    Ok(())
}
