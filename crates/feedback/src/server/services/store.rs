//! Persistence collaborators for feedback and tags
//!
//! The traits describe what the pipeline needs from storage. `InMemoryStore`
//! is the bundled implementation: records are append-only and every read
//! returns a snapshot taken under the lock.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::server::models::{FeedbackRecord, Tag};

/// Storage for feedback records
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
  /// Persist a new record and return the stored copy
  async fn create(&self, record: FeedbackRecord) -> AnalyzerResult<FeedbackRecord>;

  /// Fetch one record by id
  async fn get(&self, id: &str) -> AnalyzerResult<Option<FeedbackRecord>>;

  /// All records in insertion order
  async fn snapshot(&self) -> AnalyzerResult<Vec<FeedbackRecord>>;
}

/// Storage for tags and their attachment to feedback
#[async_trait]
pub trait TagRepository: Send + Sync {
  /// Find a tag by name (case-insensitive) or create it
  async fn get_or_create(&self, name: &str) -> AnalyzerResult<Tag>;

  /// Attach a tag to a feedback record; attaching twice is a no-op
  async fn attach(&self, feedback_id: &str, tag_id: &str) -> AnalyzerResult<()>;

  /// All known tags in creation order
  async fn list(&self) -> AnalyzerResult<Vec<Tag>>;
}

#[derive(Default)]
struct StoreInner {
  feedback: Vec<FeedbackRecord>,
  tags: Vec<Tag>,
}

/// Process-local store implementing both repositories
#[derive(Default)]
pub struct InMemoryStore {
  inner: RwLock<StoreInner>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl FeedbackRepository for InMemoryStore {
  async fn create(&self, record: FeedbackRecord) -> AnalyzerResult<FeedbackRecord> {
    let mut inner = self.inner.write().await;
    if inner.feedback.iter().any(|existing| existing.id == record.id) {
      return Err(AnalyzerError::Storage(format!("feedback {} already exists", record.id)));
    }
    inner.feedback.push(record.clone());
    Ok(record)
  }

  async fn get(&self, id: &str) -> AnalyzerResult<Option<FeedbackRecord>> {
    let inner = self.inner.read().await;
    Ok(inner.feedback.iter().find(|record| record.id == id).cloned())
  }

  async fn snapshot(&self) -> AnalyzerResult<Vec<FeedbackRecord>> {
    let inner = self.inner.read().await;
    Ok(inner.feedback.clone())
  }
}

#[async_trait]
impl TagRepository for InMemoryStore {
  async fn get_or_create(&self, name: &str) -> AnalyzerResult<Tag> {
    let name = name.trim();
    if name.is_empty() {
      return Err(AnalyzerError::Validation("Tag name is required".to_string()));
    }

    let mut inner = self.inner.write().await;
    if let Some(existing) = inner.tags.iter().find(|tag| tag.matches_name(name)) {
      return Ok(existing.clone());
    }

    let tag = Tag::new(name);
    inner.tags.push(tag.clone());
    Ok(tag)
  }

  async fn attach(&self, feedback_id: &str, tag_id: &str) -> AnalyzerResult<()> {
    let mut inner = self.inner.write().await;
    if !inner.tags.iter().any(|tag| tag.id == tag_id) {
      return Err(AnalyzerError::NotFound(format!("tag {tag_id}")));
    }

    let record = inner
      .feedback
      .iter_mut()
      .find(|record| record.id == feedback_id)
      .ok_or_else(|| AnalyzerError::NotFound(format!("feedback {feedback_id}")))?;

    if !record.has_tag(tag_id) {
      record.tag_ids.push(tag_id.to_string());
    }
    Ok(())
  }

  async fn list(&self) -> AnalyzerResult<Vec<Tag>> {
    let inner = self.inner.read().await;
    Ok(inner.tags.clone())
  }
}
