//! Feedback endpoint handlers

use axum::{
  extract::{
    rejection::{JsonRejection, QueryRejection},
    Extension, Json, Path, Query, State,
  },
  response::Json as ResponseJson,
};

use crate::error::AnalyzerError;
use crate::server::handlers::{failure, ApiFailure};
use crate::server::middleware::RequestContext;
use crate::server::models::{FeedbackRecord, QueryFilter};
use crate::server::services::intake::SubmitFeedback;
use crate::server::state::AppState;
use crate::server::types::{
  BaseResponse, FeedbackData, FeedbackQuery, FeedbackResponse, PagedFeedbackResponse, SubmitFeedbackRequest,
};

const COMPONENT: &str = "feedback-api";

/// POST /api/feedback - Classify, embed and store a submission
pub async fn submit_feedback(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  request: Result<Json<SubmitFeedbackRequest>, JsonRejection>,
) -> Result<ResponseJson<BaseResponse<FeedbackResponse>>, ApiFailure> {
  let Json(request) = request.map_err(|rejection| rejected(&context, rejection.body_text()))?;
  let submission = SubmitFeedback { message: request.message, email: request.email };

  let stored = match state.intake.submit(&context, submission).await {
    Ok(stored) => stored,
    Err(e) => {
      context.log_error(&format!("Feedback submission failed: {e}"), COMPONENT);
      return Err(failure(&e, context.request_id));
    }
  };

  let feedback = to_feedback_data(&state, &context, stored).await?;
  Ok(ResponseJson(BaseResponse::success(FeedbackResponse { feedback }, context.request_id)))
}

/// GET /api/feedback - Paged, optionally ranked and filtered feedback
pub async fn list_feedback(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  query: Result<Query<FeedbackQuery>, QueryRejection>,
) -> Result<ResponseJson<BaseResponse<PagedFeedbackResponse>>, ApiFailure> {
  let Query(query) = query.map_err(|rejection| rejected(&context, rejection.body_text()))?;
  let filter = QueryFilter::from(query);

  let page = state.query.query(&context, &filter).await.map_err(|e| {
    context.log_warn(&format!("Feedback query failed: {e}"), COMPONENT);
    failure(&e, context.request_id)
  })?;

  let known_tags = state.tags.list().await.map_err(|e| failure(&e, context.request_id))?;
  let page = page.map(|record| FeedbackData::from_record(record, &known_tags));

  Ok(ResponseJson(BaseResponse::success(PagedFeedbackResponse::from(page), context.request_id)))
}

/// GET /api/feedback/{id} - Full details of one feedback record
pub async fn get_feedback(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Path(id): Path<String>,
) -> Result<ResponseJson<BaseResponse<FeedbackResponse>>, ApiFailure> {
  let record = state
    .feedback
    .get(&id)
    .await
    .map_err(|e| failure(&e, context.request_id))?
    .ok_or_else(|| failure(&AnalyzerError::NotFound("Feedback not found".to_string()), context.request_id))?;

  let feedback = to_feedback_data(&state, &context, record).await?;
  Ok(ResponseJson(BaseResponse::success(FeedbackResponse { feedback }, context.request_id)))
}

async fn to_feedback_data(
  state: &AppState,
  context: &RequestContext,
  record: FeedbackRecord,
) -> Result<FeedbackData, ApiFailure> {
  let known_tags = state.tags.list().await.map_err(|e| failure(&e, context.request_id))?;
  Ok(FeedbackData::from_record(record, &known_tags))
}

/// Malformed body or query string, reported in the response envelope
fn rejected(context: &RequestContext, reason: String) -> ApiFailure {
  context.log_warn(&format!("Rejected request: {reason}"), COMPONENT);
  failure(&AnalyzerError::Validation(reason), context.request_id)
}
