//! Submission pipeline: validate, classify, embed, persist, tag

use std::sync::Arc;

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::server::middleware::RequestContext;
use crate::server::models::FeedbackRecord;
use crate::server::services::classification::Classifier;
use crate::server::services::embeddings::Embedder;
use crate::server::services::store::{FeedbackRepository, TagRepository};

const COMPONENT: &str = "intake";

pub const MIN_FEEDBACK_CHARS: usize = 5;

/// A feedback submission as received from a client
#[derive(Debug, Clone)]
pub struct SubmitFeedback {
  pub message: String,
  pub email: Option<String>,
}

/// Runs one submission through classification and storage
pub struct IntakePipeline {
  classifier: Arc<dyn Classifier>,
  embedder: Arc<dyn Embedder>,
  feedback: Arc<dyn FeedbackRepository>,
  tags: Arc<dyn TagRepository>,
}

impl IntakePipeline {
  pub fn new(
    classifier: Arc<dyn Classifier>,
    embedder: Arc<dyn Embedder>,
    feedback: Arc<dyn FeedbackRepository>,
    tags: Arc<dyn TagRepository>,
  ) -> Self {
    Self { classifier, embedder, feedback, tags }
  }

  pub async fn submit(
    &self,
    context: &RequestContext,
    submission: SubmitFeedback,
  ) -> AnalyzerResult<FeedbackRecord> {
    validate_message(&submission.message)?;
    context.log_info("Received feedback submission", COMPONENT);

    // Classify and embed the text exactly as submitted so identical
    // submissions share a fingerprint.
    let classification = self.classifier.classify(context, &submission.message).await?;
    if classification.is_fallback() {
      context.log_warn("Storing feedback with fallback classification", COMPONENT);
    }
    let embedding = self.embedder.embed(context, &submission.message).await?;

    let tag_names = classification.result().tags.clone();
    let record = FeedbackRecord::new(
      submission.message.trim(),
      normalize_email(submission.email),
      Some(embedding),
      classification,
    );
    let saved = self.feedback.create(record).await?;

    for name in &tag_names {
      let tag = self.tags.get_or_create(name).await?;
      self.tags.attach(&saved.id, &tag.id).await?;
    }

    let stored = self
      .feedback
      .get(&saved.id)
      .await?
      .ok_or_else(|| AnalyzerError::Storage(format!("feedback {} vanished after save", saved.id)))?;

    context.log_success(&format!("Stored feedback {} with {} tags", stored.id, stored.tag_ids.len()), COMPONENT);
    Ok(stored)
  }
}

fn validate_message(message: &str) -> AnalyzerResult<()> {
  let trimmed = message.trim();
  if trimmed.is_empty() {
    return Err(AnalyzerError::Validation("Feedback text is required.".to_string()));
  }
  if trimmed.chars().count() < MIN_FEEDBACK_CHARS {
    return Err(AnalyzerError::Validation(format!(
      "Feedback text must be at least {MIN_FEEDBACK_CHARS} characters"
    )));
  }
  Ok(())
}

fn normalize_email(email: Option<String>) -> Option<String> {
  email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::server::models::{Classification, ClassificationResult, Priority, Sentiment};
  use crate::server::services::embeddings::MockEmbedder;
  use crate::server::services::store::InMemoryStore;
  use async_trait::async_trait;
  use std::sync::atomic::{AtomicUsize, Ordering};

  struct FixedClassifier {
    tags: Vec<&'static str>,
    calls: AtomicUsize,
  }

  impl FixedClassifier {
    fn with_tags(tags: Vec<&'static str>) -> Self {
      Self { tags, calls: AtomicUsize::new(0) }
    }
  }

  #[async_trait]
  impl Classifier for FixedClassifier {
    async fn classify(&self, _context: &RequestContext, _text: &str) -> AnalyzerResult<Classification> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Ok(Classification::Parsed(ClassificationResult {
        summary: "Login is broken".to_string(),
        sentiment: Sentiment::Negative,
        priority: Priority::P3,
        next_action: "Escalate to auth team".to_string(),
        tags: self.tags.iter().map(|t| t.to_string()).collect(),
      }))
    }
  }

  struct FailingClassifier;

  #[async_trait]
  impl Classifier for FailingClassifier {
    async fn classify(&self, _context: &RequestContext, _text: &str) -> AnalyzerResult<Classification> {
      Err(AnalyzerError::Provider("OpenAI API error (500)".to_string()))
    }
  }

  fn embedder(times: usize) -> MockEmbedder {
    let mut embedder = MockEmbedder::new();
    embedder.expect_embed().times(times).returning(|_, _| Ok(vec![0.5, 0.5]));
    embedder
  }

  fn pipeline(classifier: Arc<dyn Classifier>, embedder: MockEmbedder, store: Arc<InMemoryStore>) -> IntakePipeline {
    IntakePipeline::new(classifier, Arc::new(embedder), store.clone(), store)
  }

  fn submission(message: &str) -> SubmitFeedback {
    SubmitFeedback { message: message.to_string(), email: Some(" user@example.com ".to_string()) }
  }

  #[tokio::test]
  async fn test_submit_stores_record_with_tags() {
    let store = Arc::new(InMemoryStore::new());
    let classifier = Arc::new(FixedClassifier::with_tags(vec!["login", "authentication"]));
    let intake = pipeline(classifier.clone(), embedder(1), store.clone());

    let stored = intake.submit(&RequestContext::detached(), submission("  I cannot log in since the update  ")).await.unwrap();

    assert_eq!(stored.text, "I cannot log in since the update");
    assert_eq!(stored.email.as_deref(), Some("user@example.com"));
    assert_eq!(stored.embedding, Some(vec![0.5, 0.5]));
    assert_eq!(stored.analysis().priority, Priority::P3);
    assert_eq!(stored.tag_ids.len(), 2);
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);

    let tags = store.list().await.unwrap();
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["login", "authentication"]);
  }

  #[tokio::test]
  async fn test_submissions_share_tags() {
    let store = Arc::new(InMemoryStore::new());
    let intake = pipeline(Arc::new(FixedClassifier::with_tags(vec!["login"])), embedder(2), store.clone());
    let context = RequestContext::detached();

    let first = intake.submit(&context, submission("Login page spins forever")).await.unwrap();
    let second = intake.submit(&context, submission("Cannot sign in on mobile")).await.unwrap();

    assert_eq!(first.tag_ids, second.tag_ids);
    assert_eq!(store.list().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_short_message_is_rejected_before_any_call() {
    let store = Arc::new(InMemoryStore::new());
    let classifier = Arc::new(FixedClassifier::with_tags(vec![]));
    let intake = pipeline(classifier.clone(), embedder(0), store.clone());

    for message in ["", "    ", "hey", " ab  "] {
      let result = intake.submit(&RequestContext::detached(), submission(message)).await;
      assert!(matches!(result, Err(AnalyzerError::Validation(_))), "{message:?} should be rejected");
    }
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    assert!(store.snapshot().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_provider_failure_stores_nothing() {
    let store = Arc::new(InMemoryStore::new());
    let intake = pipeline(Arc::new(FailingClassifier), embedder(0), store.clone());

    let result = intake.submit(&RequestContext::detached(), submission("The app crashes on launch")).await;
    assert!(matches!(result, Err(AnalyzerError::Provider(_))));
    assert!(store.snapshot().await.unwrap().is_empty());
  }

  #[test]
  fn test_blank_email_becomes_none() {
    assert_eq!(normalize_email(Some("   ".to_string())), None);
    assert_eq!(normalize_email(None), None);
  }
}
