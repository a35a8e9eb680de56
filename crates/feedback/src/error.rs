//! Error taxonomy shared by the services and the REST layer

use thiserror::Error;

/// Failures surfaced by the feedback pipeline
///
/// Provider output that cannot be decoded is not an error here: it is
/// recovered into a fallback classification before it reaches a caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyzerError {
  /// Input rejected before any external call
  #[error("validation failed: {0}")]
  Validation(String),

  /// Non-success status, timeout, or missing payload from a provider
  #[error("provider error: {0}")]
  Provider(String),

  /// Requested entity does not exist
  #[error("not found: {0}")]
  NotFound(String),

  /// Persistence collaborator failure
  #[error("storage error: {0}")]
  Storage(String),
}

impl AnalyzerError {
  /// Stable key used in API error payloads
  pub fn key(&self) -> &'static str {
    match self {
      AnalyzerError::Validation(_) => "validation_failed",
      AnalyzerError::Provider(_) => "provider_failed",
      AnalyzerError::NotFound(_) => "not_found",
      AnalyzerError::Storage(_) => "storage_failed",
    }
  }

  /// Wrap a transport-level reqwest failure as a provider error
  pub fn from_transport(provider: &str, err: &reqwest::Error) -> Self {
    if err.is_timeout() {
      AnalyzerError::Provider(format!("{provider} request timed out: {err}"))
    } else {
      AnalyzerError::Provider(format!("{provider} request failed: {err}"))
    }
  }

  /// Wrap a failure while reading or decoding a provider response body
  pub fn from_body(provider: &str, err: &reqwest::Error) -> Self {
    if err.is_timeout() {
      AnalyzerError::from_transport(provider, err)
    } else {
      AnalyzerError::Provider(format!("unreadable {provider} response: {err}"))
    }
  }
}

pub type AnalyzerResult<T> = std::result::Result<T, AnalyzerError>;
