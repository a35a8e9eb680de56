//! Tag endpoint handlers

use axum::{
  extract::{Extension, State},
  response::Json as ResponseJson,
};

use crate::server::handlers::{failure, ApiFailure};
use crate::server::middleware::RequestContext;
use crate::server::state::AppState;
use crate::server::types::{BaseResponse, ListTagsResponse, TagData};

/// GET /api/tags - List all tags
pub async fn list_tags(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
) -> Result<ResponseJson<BaseResponse<ListTagsResponse>>, ApiFailure> {
  let tags = state.tags.list().await.map_err(|e| failure(&e, context.request_id))?;
  let response = ListTagsResponse { tags: tags.into_iter().map(TagData::from).collect() };

  Ok(ResponseJson(BaseResponse::success(response, context.request_id)))
}
