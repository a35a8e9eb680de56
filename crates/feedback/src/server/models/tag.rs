//! Tag model

use serde::Serialize;
use uuid::Uuid;

/// A named label attached to feedback records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
  pub id: String,
  pub name: String,
}

impl Tag {
  pub fn new(name: impl Into<String>) -> Self {
    Self { id: Uuid::new_v4().to_string(), name: name.into() }
  }

  /// Tag names are unique regardless of case
  pub fn matches_name(&self, name: &str) -> bool {
    self.name.eq_ignore_ascii_case(name.trim())
  }
}
