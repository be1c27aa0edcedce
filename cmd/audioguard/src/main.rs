//! audioguard - HTTP server for audio authenticity detection.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use audioguard_detect::{DetectorConfig, LazyDetector};
use audioguard_server::{api_router, local_router, serve, AppState};

/// Audio authenticity detection server.
#[derive(Parser)]
#[command(name = "audioguard")]
#[command(about = "Detects whether speech audio is human or AI-synthesized")]
struct Cli {
    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the general REST API server (models pre-loaded at startup)
    Api(ServeArgs),
    /// Run the local single-user server with the embedded upload page
    Local(ServeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Listen address (e.g. :8080 or 127.0.0.1:8080)
    #[arg(long, default_value = ":8080")]
    addr: String,

    /// Directory holding tokenizer.onnx and classifier.onnx
    #[arg(long, default_value = "weights")]
    weights: PathBuf,

    /// Directory for per-request temp uploads
    #[arg(long, default_value = "uploads")]
    uploads: PathBuf,

    /// Use the CUDA execution provider (needs a cuda-enabled build)
    #[arg(long)]
    cuda: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    match &cli.command {
        Commands::Api(args) => run(args, true).await,
        Commands::Local(args) => run(args, false).await,
    }
}

async fn run(args: &ServeArgs, api: bool) -> Result<()> {
    let mut config = DetectorConfig::from_weights_dir(&args.weights);
    config.use_cuda = args.cuda;
    let service = Arc::new(LazyDetector::new(config));

    if api {
        // Pre-load so the first request doesn't pay the model load.
        // A bad weights directory aborts startup here instead of
        // serving degraded results.
        let warm = service.clone();
        tokio::task::spawn_blocking(move || warm.get().map(|_| ())).await??;
    } else {
        info!("models load lazily on the first request");
    }

    let state = AppState::new(service, &args.uploads)?;
    let app = if api {
        info!("endpoints: GET / | GET /health | POST /detect | POST /detect/url");
        api_router(state)
    } else {
        info!("endpoints: GET / | GET /health | POST /upload | POST /detect | POST /detect/url");
        local_router(state)
    };

    serve(&args.addr, app).await?;
    Ok(())
}
