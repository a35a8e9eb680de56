//! Request context and middleware for the feedback REST API
//!
//! Every request gets its own `RequestContext` carrying a correlation id.
//! The context is passed explicitly into each service call and dropped when
//! the request ends, so nothing about a request outlives it.

use axum::{
  extract::Request,
  http::{HeaderName, HeaderValue, Method, Uri},
  middleware::Next,
  response::Response,
};
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request context containing correlation metadata
#[derive(Debug, Clone)]
pub struct RequestContext {
  /// Unique ID for this request
  pub request_id: Uuid,
  /// HTTP method
  pub method: Method,
  /// Request URI
  pub uri: Uri,
}

impl RequestContext {
  /// Create a new request context
  pub fn new(method: Method, uri: Uri) -> Self {
    Self { request_id: Uuid::new_v4(), method, uri }
  }

  /// Context for work that did not arrive over HTTP
  pub fn detached() -> Self {
    Self::new(Method::GET, Uri::from_static("/internal"))
  }

  /// Log an info message with request context
  pub fn log_info(&self, message: &str, component: &str) {
    self.log_with_context(message, "info", component, None, None);
  }

  /// Log a success message with request context
  pub fn log_success(&self, message: &str, component: &str) {
    self.log_with_context(message, "success", component, None, None);
  }

  /// Log an error message with request context
  pub fn log_error(&self, message: &str, component: &str) {
    self.log_with_context(message, "error", component, None, None);
  }

  /// Log a warning message with request context
  pub fn log_warn(&self, message: &str, component: &str) {
    self.log_with_context(message, "warn", component, None, None);
  }

  /// Log with full context information
  pub fn log_with_context(
    &self,
    message: &str,
    level: &str,
    component: &str,
    status_code: Option<u16>,
    duration_ms: Option<f64>,
  ) {
    let request_id = self.request_id.to_string();
    let method = self.method.as_str();
    let path = self.uri.path();

    match level {
      "error" => tracing::error!(%request_id, method, path, component, status_code, duration_ms, "{message}"),
      "warn" => tracing::warn!(%request_id, method, path, component, status_code, duration_ms, "{message}"),
      "success" => {
        tracing::info!(%request_id, method, path, component, status_code, duration_ms, outcome = "success", "{message}")
      }
      _ => tracing::info!(%request_id, method, path, component, status_code, duration_ms, "{message}"),
    }
  }

  /// Log request start
  pub fn log_request_start(&self) {
    self.log_with_context("Request started", "info", "http-request", None, None);
  }

  /// Log request completion with status
  pub fn log_request_complete(&self, status_code: u16, duration_ms: f64) {
    let level = if status_code >= 500 { "error" } else { "info" };
    self.log_with_context("Request completed", level, "http-request", Some(status_code), Some(duration_ms));
  }
}

/// Middleware to inject RequestContext into all requests
pub async fn request_context_middleware(request: Request, next: Next) -> Response {
  let context = RequestContext::new(request.method().clone(), request.uri().clone());

  let start_time = Instant::now();
  context.log_request_start();

  let mut request = request;
  request.extensions_mut().insert(context.clone());

  let mut response = next.run(request).await;

  if let Ok(value) = HeaderValue::from_str(&context.request_id.to_string()) {
    response.headers_mut().insert(REQUEST_ID_HEADER, value);
  }

  let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
  context.log_request_complete(response.status().as_u16(), duration_ms);

  response
}
