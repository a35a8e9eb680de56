//! Feedback records and their classification
//!
//! Sentiment and priority are closed enumerations. Parsing accepts any
//! letter case so provider output like "Positive" or "p2" is still valid,
//! while anything outside the enumeration is rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum number of tags a classification may carry
pub const MAX_TAGS: usize = 5;

// Enumerations
// ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
  Positive,
  Neutral,
  Negative,
}

impl Sentiment {
  pub fn as_str(&self) -> &'static str {
    match self {
      Sentiment::Positive => "positive",
      Sentiment::Neutral => "neutral",
      Sentiment::Negative => "negative",
    }
  }
}

impl FromStr for Sentiment {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "positive" => Ok(Sentiment::Positive),
      "neutral" => Ok(Sentiment::Neutral),
      "negative" => Ok(Sentiment::Negative),
      other => Err(format!("unknown sentiment '{other}'")),
    }
  }
}

impl fmt::Display for Sentiment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for Sentiment {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

/// Urgency bucket; P0 is the least urgent, P3 the most
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Priority {
  P0,
  P1,
  P2,
  P3,
}

impl Priority {
  pub const LOWEST_URGENCY: Priority = Priority::P0;

  pub fn as_str(&self) -> &'static str {
    match self {
      Priority::P0 => "P0",
      Priority::P1 => "P1",
      Priority::P2 => "P2",
      Priority::P3 => "P3",
    }
  }
}

impl FromStr for Priority {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().as_str() {
      "P0" => Ok(Priority::P0),
      "P1" => Ok(Priority::P1),
      "P2" => Ok(Priority::P2),
      "P3" => Ok(Priority::P3),
      other => Err(format!("unknown priority '{other}'")),
    }
  }
}

impl fmt::Display for Priority {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for Priority {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

// Classification
// ==============

/// Structured analysis of one piece of feedback
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
  pub summary: String,
  pub sentiment: Sentiment,
  pub priority: Priority,
  pub next_action: String,
  pub tags: Vec<String>,
}

impl ClassificationResult {
  /// Lowercase, trim and de-duplicate tags, keeping at most MAX_TAGS
  pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
      let tag = tag.as_ref().trim().to_lowercase();
      if tag.is_empty() || normalized.contains(&tag) {
        continue;
      }
      normalized.push(tag);
      if normalized.len() == MAX_TAGS {
        break;
      }
    }
    normalized
  }
}

/// Where a classification came from
///
/// Both variants satisfy the same downstream contract; the tag lets callers
/// audit which results were synthesized instead of produced by the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
  Parsed(ClassificationResult),
  Fallback(ClassificationResult),
}

impl Classification {
  pub fn result(&self) -> &ClassificationResult {
    match self {
      Classification::Parsed(result) | Classification::Fallback(result) => result,
    }
  }

  pub fn into_result(self) -> ClassificationResult {
    match self {
      Classification::Parsed(result) | Classification::Fallback(result) => result,
    }
  }

  pub fn is_fallback(&self) -> bool {
    matches!(self, Classification::Fallback(_))
  }
}

// Feedback
// ========

/// A stored piece of feedback with its analysis and embedding
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRecord {
  pub id: String,
  pub text: String,
  pub email: Option<String>,
  pub created_at: DateTime<Utc>,
  pub embedding: Option<Vec<f32>>,
  pub classification: Classification,
  pub tag_ids: Vec<String>,
}

impl FeedbackRecord {
  pub fn new(
    text: impl Into<String>,
    email: Option<String>,
    embedding: Option<Vec<f32>>,
    classification: Classification,
  ) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      text: text.into(),
      email,
      created_at: Utc::now(),
      embedding,
      classification,
      tag_ids: Vec::new(),
    }
  }

  pub fn analysis(&self) -> &ClassificationResult {
    self.classification.result()
  }

  pub fn has_tag(&self, tag_id: &str) -> bool {
    self.tag_ids.iter().any(|id| id == tag_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sentiment_parses_any_case() {
    assert_eq!("Positive".parse::<Sentiment>().unwrap(), Sentiment::Positive);
    assert_eq!(" NEGATIVE ".parse::<Sentiment>().unwrap(), Sentiment::Negative);
    assert!("mixed".parse::<Sentiment>().is_err());
  }

  #[test]
  fn test_priority_rejects_values_outside_enumeration() {
    assert_eq!("p3".parse::<Priority>().unwrap(), Priority::P3);
    assert!("Low".parse::<Priority>().is_err());
    assert!("P4".parse::<Priority>().is_err());
  }

  #[test]
  fn test_priority_ordering_tracks_urgency() {
    assert!(Priority::P3 > Priority::P0);
    assert_eq!(Priority::LOWEST_URGENCY, Priority::P0);
  }

  #[test]
  fn test_normalize_tags_dedupes_and_caps() {
    let tags = ClassificationResult::normalize_tags([
      "UI", "ui", " billing ", "", "login", "crash", "sync", "api",
    ]);
    assert_eq!(tags, vec!["ui", "billing", "login", "crash", "sync"]);
  }

  #[test]
  fn test_classification_serializes_camel_case() {
    let result = ClassificationResult {
      summary: "s".to_string(),
      sentiment: Sentiment::Neutral,
      priority: Priority::P1,
      next_action: "n".to_string(),
      tags: vec!["ux".to_string()],
    };
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["nextAction"], "n");
    assert_eq!(json["sentiment"], "neutral");
    assert_eq!(json["priority"], "P1");
  }
}
