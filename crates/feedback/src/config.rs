//! Provider and retrieval configuration
//!
//! Values come from command-line flags with environment-variable fallbacks,
//! so the server can be configured either way.

use clap::builder::TypedValueParser;
use clap::Args;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TOP_K: usize = 2;
pub const DEFAULT_BIND: &str = "127.0.0.1:5080";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:4200";

/// Settings for the external classification and embedding provider
#[derive(Debug, Clone, Args)]
pub struct ProviderConfig {
  /// API key sent as a bearer token
  #[arg(long = "api-key", env = "OPENAI_API_KEY", hide_env_values = true)]
  pub api_key: String,

  /// Provider base URL (without the /v1 suffix)
  #[arg(long = "provider-url", env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
  pub base_url: String,

  /// Chat model used for classification
  #[arg(long = "model", env = "OPENAI_MODEL", default_value = DEFAULT_CHAT_MODEL)]
  pub model: String,

  /// Model used for embeddings
  #[arg(long = "embedding-model", env = "OPENAI_EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
  pub embedding_model: String,

  /// Upper bound for a single provider round trip, in seconds
  #[arg(long = "provider-timeout", env = "PROVIDER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
  pub timeout_secs: u64,
}

impl ProviderConfig {
  /// Config pointing at an arbitrary base URL with default models
  pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
    Self {
      api_key: api_key.into(),
      base_url: base_url.into(),
      model: DEFAULT_CHAT_MODEL.to_string(),
      embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }

  /// Join an API path onto the base URL
  pub fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
  }
}

/// Settings for semantic retrieval
#[derive(Debug, Clone, Args)]
pub struct RetrievalConfig {
  /// Number of nearest records kept by semantic search
  #[arg(
    long = "top-k",
    env = "SEMANTIC_TOP_K",
    default_value_t = DEFAULT_TOP_K,
    value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize)
  )]
  pub top_k: usize,
}

impl Default for RetrievalConfig {
  fn default() -> Self {
    Self { top_k: DEFAULT_TOP_K }
  }
}
