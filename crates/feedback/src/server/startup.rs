//! REST server startup and configuration

use anyhow::{Context, Result};
use axum::{
  http::{HeaderValue, Method},
  serve,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use crate::server::routing::create_router;
use crate::server::state::AppState;

/// CORS policy allowing a single browser origin
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
  let origin = HeaderValue::from_str(origin).with_context(|| format!("invalid CORS origin: {origin}"))?;

  Ok(
    CorsLayer::new()
      .allow_origin(origin)
      .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
      .allow_headers(Any),
  )
}

/// Start the REST server
pub async fn start_server(addr: SocketAddr, state: AppState, cors_origin: &str) -> Result<()> {
  tracing::info!("Starting feedback REST server on {addr}");

  let app = create_router(state)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors_layer(cors_origin)?));

  let listener = TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;
  tracing::info!("Server listening on {addr}");

  match serve(listener, app).await {
    Ok(()) => {
      tracing::info!("Server shutdown gracefully");
      Ok(())
    }
    Err(e) => {
      tracing::error!("Server error: {e}");
      Err(anyhow::anyhow!("Server error: {}", e))
    }
  }
}
