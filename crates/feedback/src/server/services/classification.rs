//! Feedback classification through the chat-completions provider
//!
//! Results are cached by content fingerprint. Provider output that does not
//! match the expected schema is replaced with a conservative fallback, which
//! is cached just like a parsed result.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::config::ProviderConfig;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::server::middleware::RequestContext;
use crate::server::models::{Classification, ClassificationResult, Priority, Sentiment};
use crate::server::services::cache::ResultCache;
use crate::server::services::fingerprint::fingerprint;

const COMPONENT: &str = "classification";
const CHAT_COMPLETIONS_PATH: &str = "v1/chat/completions";

pub const FALLBACK_SUMMARY_CHARS: usize = 80;
pub const FALLBACK_TAG: &str = "review";
pub const FALLBACK_NEXT_ACTION: &str = "Requires manual review.";

pub const SYSTEM_PROMPT: &str = r#"You are an AI that analyzes software application user feedback.
You must return ONLY a valid JSON object.
No markdown, no code fences, no explanations, no additional text.

Strict Output Schema:
{
"summary": "string (1-50 words, professional, no PII, no quotes)",
"sentiment": "positive" | "neutral" | "negative",
"tags": ["tag1", "tag2", ... up to 5 max],
"priority": "P0" | "P1" | "P2" | "P3",
"nextAction": "string (1 sentence, specific, no PII)"
}

Tag Rules:
- Tags must be common software/system categories such as
  "billing", "payments", "login", "authentication", "performance",
  "latency", "crash", "bug", "ui", "ux", "navigation", "checkout",
  "notifications", "settings", "account", "security", "support",
  "data", "integration", "sync", "api", "feature-request".
- Tags must be short lowercase nouns reflecting the core issue.
- Use 1-5 tags.

Priority Rules:
- P0 = lowest urgency (minor, cosmetic, non-impacting)
- P1 = low urgency (inconvenience, workaround exists)
- P2 = medium urgency (affects functionality or flow)
- P3 = highest urgency (critical outage, blockers, security risks)

Safety:
- The summary must remove PII (names, emails, phones).
- Keep tone concise, neutral, professional.
- Never include commentary or reasoning.

If unsure about any field, choose the safest conservative option."#;

// Wire types
// ==========

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  response_format: ResponseFormat,
  messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
  #[serde(rename = "type")]
  kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
  role: &'static str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
  message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
  #[serde(default)]
  content: Option<String>,
}

/// Provider payload after field names have been lowercased
#[derive(Debug, Deserialize)]
struct RawClassification {
  summary: String,
  sentiment: Sentiment,
  tags: Vec<String>,
  priority: Priority,
  #[serde(rename = "nextaction")]
  next_action: String,
}

// Service seam
// ============

/// Anything that can turn feedback text into a classification
#[async_trait]
pub trait Classifier: Send + Sync {
  async fn classify(&self, context: &RequestContext, text: &str) -> AnalyzerResult<Classification>;
}

/// HTTP client for the chat-completions provider, fronted by the result cache
pub struct ClassificationClient {
  http: reqwest::Client,
  config: ProviderConfig,
  cache: Arc<ResultCache<Classification>>,
}

impl ClassificationClient {
  pub fn new(config: ProviderConfig) -> AnalyzerResult<Self> {
    Self::with_cache(config, Arc::new(ResultCache::new()))
  }

  /// Build a client that shares an existing cache
  pub fn with_cache(
    config: ProviderConfig,
    cache: Arc<ResultCache<Classification>>,
  ) -> AnalyzerResult<Self> {
    let http = reqwest::Client::builder()
      .timeout(config.timeout())
      .build()
      .map_err(|e| AnalyzerError::Provider(format!("failed to build HTTP client: {e}")))?;

    Ok(Self { http, config, cache })
  }

  pub fn cache(&self) -> &Arc<ResultCache<Classification>> {
    &self.cache
  }

  async fn request_classification(
    &self,
    context: &RequestContext,
    text: &str,
  ) -> AnalyzerResult<Classification> {
    let payload = ChatRequest {
      model: &self.config.model,
      response_format: ResponseFormat { kind: "json_object" },
      messages: [
        ChatMessage { role: "system", content: SYSTEM_PROMPT },
        ChatMessage { role: "user", content: text },
      ],
    };

    context.log_info("Sending classification request", COMPONENT);
    let started = Instant::now();

    let response = self
      .http
      .post(self.config.endpoint(CHAT_COMPLETIONS_PATH))
      .bearer_auth(&self.config.api_key)
      .json(&payload)
      .send()
      .await
      .map_err(|e| AnalyzerError::from_transport("classification", &e))?;

    let status = response.status();
    context.log_with_context(
      "Classification response received",
      "info",
      COMPONENT,
      Some(status.as_u16()),
      Some(started.elapsed().as_secs_f64() * 1000.0),
    );

    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(AnalyzerError::Provider(format!("OpenAI API error ({status}): {body}")));
    }

    let envelope: ChatResponse = response
      .json()
      .await
      .map_err(|e| AnalyzerError::from_body("classification", &e))?;

    let content = envelope
      .choices
      .into_iter()
      .next()
      .ok_or_else(|| AnalyzerError::Provider("OpenAI returned no choices.".to_string()))?
      .message
      .content
      .unwrap_or_default();

    Ok(interpret_content(context, text, &content))
  }
}

#[async_trait]
impl Classifier for ClassificationClient {
  async fn classify(&self, context: &RequestContext, text: &str) -> AnalyzerResult<Classification> {
    if text.trim().is_empty() {
      return Err(AnalyzerError::Validation("Feedback text is required.".to_string()));
    }

    let key = fingerprint(text);
    if let Some(cached) = self.cache.get(&key).await {
      context.log_info(&format!("Cache hit for fingerprint {key}"), COMPONENT);
      return Ok(cached);
    }

    context.log_info(&format!("Cache miss for fingerprint {key}"), COMPONENT);
    let outcome = self.cache.get_or_try_compute(&key, || self.request_classification(context, text)).await;

    match &outcome {
      Ok(_) => context.log_success("Classification finished", COMPONENT),
      Err(e) => context.log_error(&format!("Classification failed: {e}"), COMPONENT),
    }
    outcome
  }
}

// Response interpretation
// =======================

/// Decode provider content, falling back when it does not fit the schema
fn interpret_content(context: &RequestContext, text: &str, content: &str) -> Classification {
  match decode_classification(content) {
    Ok(result) => Classification::Parsed(result),
    Err(e) => {
      context.log_warn(&format!("Provider content did not match schema, using fallback: {e}"), COMPONENT);
      Classification::Fallback(fallback_classification(text))
    }
  }
}

/// Reduce raw provider content to the JSON object it is supposed to contain
pub fn extract_json_block(raw: &str) -> String {
  if raw.trim().is_empty() {
    return "{}".to_string();
  }

  let clean = raw.replace("```json", "").replace("```", "");
  let clean = clean.trim();

  match (clean.find('{'), clean.rfind('}')) {
    (Some(start), Some(end)) if end > start => clean[start..=end].to_string(),
    _ => clean.to_string(),
  }
}

/// Decode content against the classification schema
///
/// Field names match case-insensitively, so `NextAction` and `nextaction`
/// are both accepted.
pub fn decode_classification(content: &str) -> Result<ClassificationResult, serde_json::Error> {
  let value: Value = serde_json::from_str(&extract_json_block(content))?;
  let value = match value {
    Value::Object(fields) => Value::Object(lowercase_keys(fields)),
    other => other,
  };

  let raw: RawClassification = serde_json::from_value(value)?;
  Ok(ClassificationResult {
    summary: raw.summary,
    sentiment: raw.sentiment,
    priority: raw.priority,
    next_action: raw.next_action,
    tags: ClassificationResult::normalize_tags(raw.tags),
  })
}

fn lowercase_keys(fields: Map<String, Value>) -> Map<String, Value> {
  fields.into_iter().map(|(key, value)| (key.to_lowercase(), value)).collect()
}

/// Conservative classification used when provider output is unusable
pub fn fallback_classification(text: &str) -> ClassificationResult {
  let summary = if text.chars().count() > FALLBACK_SUMMARY_CHARS {
    let head: String = text.chars().take(FALLBACK_SUMMARY_CHARS).collect();
    format!("{head}...")
  } else {
    text.to_string()
  };

  ClassificationResult {
    summary,
    sentiment: Sentiment::Neutral,
    priority: Priority::LOWEST_URGENCY,
    next_action: FALLBACK_NEXT_ACTION.to_string(),
    tags: vec![FALLBACK_TAG.to_string()],
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const VALID: &str = r#"{"summary":"User likes UI","sentiment":"positive","tags":["ux","usability"],"priority":"P1","nextAction":"Keep improving UI"}"#;

  #[test]
  fn test_decode_valid_payload() {
    let result = decode_classification(VALID).unwrap();
    assert_eq!(result.summary, "User likes UI");
    assert_eq!(result.sentiment, Sentiment::Positive);
    assert_eq!(result.tags, vec!["ux", "usability"]);
    assert_eq!(result.priority, Priority::P1);
    assert_eq!(result.next_action, "Keep improving UI");
  }

  #[test]
  fn test_decode_ignores_field_name_case() {
    let content = r#"{"Summary":"Crash on save","SENTIMENT":"Negative","Tags":["crash"],"Priority":"p3","NEXTACTION":"Escalate"}"#;
    let result = decode_classification(content).unwrap();
    assert_eq!(result.sentiment, Sentiment::Negative);
    assert_eq!(result.priority, Priority::P3);
    assert_eq!(result.next_action, "Escalate");
  }

  #[test]
  fn test_decode_rejects_values_outside_enumerations() {
    let content = VALID.replace("\"P1\"", "\"Low\"");
    assert!(decode_classification(&content).is_err());

    let content = VALID.replace("\"positive\"", "\"ecstatic\"");
    assert!(decode_classification(&content).is_err());
  }

  #[test]
  fn test_decode_rejects_missing_fields() {
    assert!(decode_classification(r#"{"summary":"only a summary"}"#).is_err());
    assert!(decode_classification("").is_err());
  }

  #[test]
  fn test_decode_caps_tags() {
    let content = VALID.replace(r#"["ux","usability"]"#, r#"["a","b","c","d","e","f","g"]"#);
    let result = decode_classification(&content).unwrap();
    assert_eq!(result.tags.len(), 5);
  }

  #[test]
  fn test_extract_json_block_strips_fences_and_chatter() {
    let raw = format!("Sure! Here you go:\n```json\n{VALID}\n```\nHope that helps.");
    assert_eq!(extract_json_block(&raw), VALID);
  }

  #[test]
  fn test_extract_json_block_blank_content() {
    assert_eq!(extract_json_block("   \n"), "{}");
  }

  #[test]
  fn test_extract_json_block_without_braces_passes_through() {
    assert_eq!(extract_json_block(" this is not JSON "), "this is not JSON");
  }

  #[test]
  fn test_fallback_truncates_long_text() {
    let text = "x".repeat(120);
    let fallback = fallback_classification(&text);
    assert_eq!(fallback.summary.chars().count(), 83);
    assert!(fallback.summary.ends_with("..."));
    assert_eq!(fallback.sentiment, Sentiment::Neutral);
    assert_eq!(fallback.priority, Priority::P0);
    assert_eq!(fallback.tags, vec!["review"]);
    assert_eq!(fallback.next_action, FALLBACK_NEXT_ACTION);
  }

  #[test]
  fn test_fallback_keeps_short_text() {
    let fallback = fallback_classification("Short note");
    assert_eq!(fallback.summary, "Short note");
  }

  #[test]
  fn test_fallback_counts_characters_not_bytes() {
    let text = "é".repeat(90);
    let fallback = fallback_classification(&text);
    assert_eq!(fallback.summary.chars().count(), 83);
  }

  #[test]
  fn test_interpret_content_tags_source() {
    let context = RequestContext::detached();
    assert!(!interpret_content(&context, "text", VALID).is_fallback());
    assert!(interpret_content(&context, "text", "this is not JSON").is_fallback());
  }
}
