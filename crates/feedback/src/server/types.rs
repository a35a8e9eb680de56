//! REST API types with schemars annotations for schema generation

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AnalyzerError;
use crate::server::models::{
  filter::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE},
  ClassificationResult, FeedbackRecord, Page, QueryFilter, SearchMode, Tag,
};

// Base Response Structure
// ======================

/// Base response object for all API endpoints
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BaseResponse<T> {
  /// API versioning information
  pub versioning: VersionInfo,

  /// Transaction ID for logging correlation (the request id)
  pub transaction_id: Uuid,

  /// Optional error information
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,

  /// Response data (generic for different endpoint types)
  #[serde(flatten)]
  pub data: T,
}

/// API versioning information
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionInfo {
  pub latest: String,
  pub requested: String,
  pub resolved: String,
}

/// API error information
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApiError {
  /// Error key, unique to the error source
  pub key: String,

  /// Human readable error message
  pub message: String,
}

// Status/Version Endpoints
// =======================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionResponse {
  pub version: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StatusResponse {
  pub status: String,
  pub version: String,
  pub stored_feedback: usize,
  pub cached_classifications: usize,
}

/// Response for /api endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiInfoResponse {
  pub latest: String,

  /// JSON schemas of the request payloads
  pub schemas: serde_json::Value,
}

// Feedback Endpoints
// ==================

/// Request for POST /api/feedback
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SubmitFeedbackRequest {
  /// Free-text feedback
  pub message: String,

  /// Optional contact address
  #[serde(default)]
  pub email: Option<String>,
}

/// Query string for GET /api/feedback
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackQuery {
  /// Search term; ranks semantically unless mode is keyword
  #[serde(default)]
  pub search: Option<String>,

  /// "semantic" (default) or "keyword"
  #[serde(default)]
  #[schemars(with = "Option<String>")]
  pub mode: Option<SearchMode>,

  /// Sentiment to keep (positive, neutral, negative)
  #[serde(default)]
  pub sentiment: Option<String>,

  /// Tag identifier to keep
  #[serde(default)]
  pub tag: Option<String>,

  #[serde(default = "default_page_number")]
  pub page_number: usize,

  #[serde(default = "default_page_size")]
  pub page_size: usize,
}

fn default_page_number() -> usize {
  DEFAULT_PAGE_NUMBER
}

fn default_page_size() -> usize {
  DEFAULT_PAGE_SIZE
}

impl From<FeedbackQuery> for QueryFilter {
  fn from(query: FeedbackQuery) -> Self {
    QueryFilter {
      search: query.search,
      mode: query.mode.unwrap_or_default(),
      sentiment: query.sentiment,
      tag: query.tag,
      page_number: query.page_number,
      page_size: query.page_size,
    }
  }
}

/// Tag as exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TagData {
  pub id: String,
  pub name: String,
}

impl From<Tag> for TagData {
  fn from(tag: Tag) -> Self {
    Self { id: tag.id, name: tag.name }
  }
}

/// Feedback as exposed over the API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackData {
  pub id: String,
  pub text: String,
  pub email: Option<String>,
  pub created_at: DateTime<Utc>,
  pub analysis: ClassificationResult,

  /// True when the analysis was synthesized because provider output was unusable
  pub needs_review: bool,
  pub tags: Vec<TagData>,
}

impl FeedbackData {
  /// Build the API view, resolving tag ids against the known tags
  pub fn from_record(record: FeedbackRecord, known_tags: &[Tag]) -> Self {
    let tags = record
      .tag_ids
      .iter()
      .filter_map(|id| known_tags.iter().find(|tag| &tag.id == id))
      .cloned()
      .map(TagData::from)
      .collect();

    let needs_review = record.classification.is_fallback();
    Self {
      id: record.id,
      text: record.text,
      email: record.email,
      created_at: record.created_at,
      analysis: record.classification.into_result(),
      needs_review,
      tags,
    }
  }
}

/// Response for POST /api/feedback and GET /api/feedback/{id}
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
  pub feedback: FeedbackData,
}

/// Response for GET /api/feedback
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedFeedbackResponse {
  pub data: Vec<FeedbackData>,
  pub current_page: usize,
  pub page_size: usize,
  pub total_records: usize,
  pub total_pages: usize,
}

impl From<Page<FeedbackData>> for PagedFeedbackResponse {
  fn from(page: Page<FeedbackData>) -> Self {
    Self {
      data: page.data,
      current_page: page.current_page,
      page_size: page.page_size,
      total_records: page.total_records,
      total_pages: page.total_pages,
    }
  }
}

/// Response for GET /api/tags
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListTagsResponse {
  pub tags: Vec<TagData>,
}

// Implementation helpers
// ======================

fn version_info() -> VersionInfo {
  let version = env!("CARGO_PKG_VERSION");
  VersionInfo { latest: version.to_string(), requested: version.to_string(), resolved: version.to_string() }
}

impl<T> BaseResponse<T> {
  /// Create a successful response
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    Self { versioning: version_info(), transaction_id, errors: Vec::new(), data }
  }

  /// Create an error response
  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> BaseResponse<()> {
    BaseResponse { versioning: version_info(), transaction_id, errors, data: () }
  }
}

impl ApiError {
  pub fn new(key: &str, message: &str) -> Self {
    Self { key: key.to_string(), message: message.to_string() }
  }
}

impl From<&AnalyzerError> for ApiError {
  fn from(err: &AnalyzerError) -> Self {
    ApiError::new(err.key(), &err.to_string())
  }
}
