//! Feedback REST Server
//!
//! HTTP API that classifies incoming feedback through a language-model
//! provider and serves ranked, filtered, paged queries over it.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use feedback::config::{ProviderConfig, RetrievalConfig, DEFAULT_BIND, DEFAULT_CORS_ORIGIN};
use feedback::server::{startup::start_server, state::AppState};

#[derive(Parser)]
#[command(name = "feedback_server")]
#[command(about = "Feedback Classification and Retrieval Server")]
#[command(version)]
struct Args {
  /// Server bind address
  #[arg(long, env = "FEEDBACK_BIND", default_value = DEFAULT_BIND)]
  bind: SocketAddr,

  /// Browser origin allowed by CORS
  #[arg(long, env = "CORS_ORIGIN", default_value = DEFAULT_CORS_ORIGIN)]
  cors_origin: String,

  #[command(flatten)]
  provider: ProviderConfig,

  #[command(flatten)]
  retrieval: RetrievalConfig,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let filter = if args.verbose {
    EnvFilter::new("debug,hyper=info,reqwest=info")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("feedback=info,tower_http=info,warn"))
  };

  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  tracing::info!("Starting Feedback REST Server v{}", env!("CARGO_PKG_VERSION"));
  tracing::info!(
    model = %args.provider.model,
    embedding_model = %args.provider.embedding_model,
    top_k = args.retrieval.top_k,
    "Provider configured at {}",
    args.provider.base_url
  );

  let state = AppState::from_config(&args.provider, &args.retrieval)?;
  start_server(args.bind, state, &args.cors_origin).await?;

  Ok(())
}
