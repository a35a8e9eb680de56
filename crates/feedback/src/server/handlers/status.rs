//! Status and version endpoint handlers

use axum::{
  extract::{Extension, State},
  response::Json as ResponseJson,
};
use serde_json::json;

use crate::server::handlers::{failure, ApiFailure};
use crate::server::middleware::RequestContext;
use crate::server::state::AppState;
use crate::server::types::{
  ApiInfoResponse, BaseResponse, FeedbackQuery, StatusResponse, SubmitFeedbackRequest, VersionResponse,
};

/// GET / - Welcome text
pub async fn welcome() -> &'static str {
  "Welcome to the Feedback Analyzer API!"
}

/// GET /status - Health check endpoint
pub async fn status(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
) -> Result<ResponseJson<BaseResponse<StatusResponse>>, ApiFailure> {
  let stored = state.feedback.snapshot().await.map_err(|e| failure(&e, context.request_id))?;

  let response = StatusResponse {
    status: "healthy".to_string(),
    version: env!("CARGO_PKG_VERSION").to_string(),
    stored_feedback: stored.len(),
    cached_classifications: state.cache.len().await,
  };
  Ok(ResponseJson(BaseResponse::success(response, context.request_id)))
}

/// GET /version - Returns current API version
pub async fn version(Extension(context): Extension<RequestContext>) -> ResponseJson<BaseResponse<VersionResponse>> {
  let response = VersionResponse { version: env!("CARGO_PKG_VERSION").to_string() };
  ResponseJson(BaseResponse::success(response, context.request_id))
}

/// GET /api - API version and request schemas
pub async fn api_info(Extension(context): Extension<RequestContext>) -> ResponseJson<BaseResponse<ApiInfoResponse>> {
  let schemas = json!({
    "submitFeedback": schemars::schema_for!(SubmitFeedbackRequest),
    "feedbackQuery": schemars::schema_for!(FeedbackQuery),
  });

  let response = ApiInfoResponse { latest: env!("CARGO_PKG_VERSION").to_string(), schemas };
  ResponseJson(BaseResponse::success(response, context.request_id))
}
