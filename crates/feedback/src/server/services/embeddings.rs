//! Text embeddings from the remote embedding provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::ProviderConfig;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::server::middleware::RequestContext;

const COMPONENT: &str = "embeddings";
const EMBEDDINGS_PATH: &str = "v1/embeddings";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
  model: &'a str,
  input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
  #[serde(default)]
  data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
  #[serde(default)]
  embedding: Vec<f32>,
}

/// Source of embedding vectors, injectable for testing
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
  /// Embed one text; every vector from one embedder has the same dimension
  async fn embed(&self, context: &RequestContext, text: &str) -> AnalyzerResult<Vec<f32>>;
}

/// HTTP client for the embeddings endpoint
pub struct EmbeddingClient {
  http: reqwest::Client,
  config: ProviderConfig,
}

impl EmbeddingClient {
  pub fn new(config: ProviderConfig) -> AnalyzerResult<Self> {
    let http = reqwest::Client::builder()
      .timeout(config.timeout())
      .build()
      .map_err(|e| AnalyzerError::Provider(format!("failed to build HTTP client: {e}")))?;

    Ok(Self { http, config })
  }
}

#[async_trait]
impl Embedder for EmbeddingClient {
  async fn embed(&self, context: &RequestContext, text: &str) -> AnalyzerResult<Vec<f32>> {
    if text.trim().is_empty() {
      return Err(AnalyzerError::Validation("Cannot embed empty text".to_string()));
    }

    let payload = EmbeddingRequest { model: &self.config.embedding_model, input: text };
    let started = Instant::now();

    let response = self
      .http
      .post(self.config.endpoint(EMBEDDINGS_PATH))
      .bearer_auth(&self.config.api_key)
      .json(&payload)
      .send()
      .await
      .map_err(|e| AnalyzerError::from_transport("embedding", &e))?;

    let status = response.status();
    context.log_with_context(
      "Embedding response received",
      "info",
      COMPONENT,
      Some(status.as_u16()),
      Some(started.elapsed().as_secs_f64() * 1000.0),
    );

    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(AnalyzerError::Provider(format!("Embedding API error ({status}): {body}")));
    }

    let parsed: EmbeddingResponse = response
      .json()
      .await
      .map_err(|e| AnalyzerError::from_body("embedding", &e))?;

    parsed
      .data
      .into_iter()
      .next()
      .map(|data| data.embedding)
      .filter(|embedding| !embedding.is_empty())
      .ok_or_else(|| AnalyzerError::Provider("Embedding API returned no vector data".to_string()))
  }
}
