//! # paraslab server (`paraslab-server`)
//!
//! Loads a pretrained HuggingFace tokenizer once at startup and serves the
//! chunking API over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! paraslab-server --tokenizer ./deepseek_v3_tokenizer --port 5000
//! ```
//!
//! | Flag | Env | Default |
//! |------|-----|---------|
//! | `--tokenizer` | `PARASLAB_TOKENIZER` | `.` (directory holding `tokenizer.json`) |
//! | `--host` | `PARASLAB_HOST` | `0.0.0.0` |
//! | `--port` | `PORT` | `5000` |
//! | `--allow-origin` | `PARASLAB_ALLOW_ORIGIN` | any origin |
//! | `--max-body-bytes` | `PARASLAB_MAX_BODY_BYTES` | unlimited |
//!
//! Log verbosity follows `RUST_LOG` (default `info`; `paraslab=debug` logs
//! every chunk).

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use paraslab::server::{run_server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Paragraph-aligned, token-budgeted text chunking over HTTP.
#[derive(Parser, Debug)]
#[command(name = "paraslab-server", version, about)]
struct Cli {
    /// Path to a `tokenizer.json`, or a directory containing one.
    #[arg(long, env = "PARASLAB_TOKENIZER", default_value = ".")]
    tokenizer: PathBuf,

    /// Interface to listen on.
    #[arg(long, env = "PARASLAB_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Only allow cross-origin requests from this origin.
    #[arg(long, env = "PARASLAB_ALLOW_ORIGIN")]
    allow_origin: Option<String>,

    /// Reject request bodies larger than this many bytes.
    #[arg(long, env = "PARASLAB_MAX_BODY_BYTES")]
    max_body_bytes: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let tokenizer = paraslab::load_pretrained(&cli.tokenizer)
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("loading tokenizer from {}", cli.tokenizer.display()))?;
    tracing::info!(path = %cli.tokenizer.display(), "tokenizer loaded");

    let config = ServerConfig {
        bind: SocketAddr::new(cli.host, cli.port),
        allow_origin: cli.allow_origin,
        max_body_bytes: cli.max_body_bytes,
    };

    run_server(Arc::new(tokenizer), &config).await
}
