//! HTTP handlers for all endpoints

pub mod feedback;
pub mod status;
pub mod tags;

use axum::{http::StatusCode, response::Json as ResponseJson};
use uuid::Uuid;

use crate::error::AnalyzerError;
use crate::server::types::{ApiError, BaseResponse};

/// Error half of every handler result
pub type ApiFailure = (StatusCode, ResponseJson<BaseResponse<()>>);

/// HTTP status for each error class
pub fn status_for(err: &AnalyzerError) -> StatusCode {
  match err {
    AnalyzerError::Validation(_) => StatusCode::BAD_REQUEST,
    AnalyzerError::NotFound(_) => StatusCode::NOT_FOUND,
    AnalyzerError::Provider(_) => StatusCode::BAD_GATEWAY,
    AnalyzerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

/// Wrap an error in the response envelope
pub fn failure(err: &AnalyzerError, transaction_id: Uuid) -> ApiFailure {
  (status_for(err), ResponseJson(BaseResponse::<()>::error(vec![ApiError::from(err)], transaction_id)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_status_mapping() {
    assert_eq!(status_for(&AnalyzerError::Validation(String::new())), StatusCode::BAD_REQUEST);
    assert_eq!(status_for(&AnalyzerError::NotFound(String::new())), StatusCode::NOT_FOUND);
    assert_eq!(status_for(&AnalyzerError::Provider(String::new())), StatusCode::BAD_GATEWAY);
    assert_eq!(status_for(&AnalyzerError::Storage(String::new())), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
