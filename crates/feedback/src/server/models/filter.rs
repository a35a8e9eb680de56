//! Query filters and paged results

use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, AnalyzerResult};

pub const DEFAULT_PAGE_NUMBER: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// How a non-empty search term is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
  /// Rank by embedding similarity to the search term
  #[default]
  Semantic,
  /// Case-insensitive substring match on text and summary
  Keyword,
}

/// Criteria for one page of feedback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
  pub search: Option<String>,
  pub mode: SearchMode,
  pub sentiment: Option<String>,
  pub tag: Option<String>,
  pub page_number: usize,
  pub page_size: usize,
}

impl Default for QueryFilter {
  fn default() -> Self {
    Self {
      search: None,
      mode: SearchMode::default(),
      sentiment: None,
      tag: None,
      page_number: DEFAULT_PAGE_NUMBER,
      page_size: DEFAULT_PAGE_SIZE,
    }
  }
}

impl QueryFilter {
  pub fn validate(&self) -> AnalyzerResult<()> {
    if self.page_number == 0 {
      return Err(AnalyzerError::Validation("pageNumber must be at least 1".to_string()));
    }
    if self.page_size == 0 {
      return Err(AnalyzerError::Validation("pageSize must be at least 1".to_string()));
    }
    Ok(())
  }

  /// Trimmed search term, if any
  pub fn search_term(&self) -> Option<&str> {
    non_blank(self.search.as_deref())
  }

  pub fn sentiment_filter(&self) -> Option<&str> {
    non_blank(self.sentiment.as_deref())
  }

  pub fn tag_filter(&self) -> Option<&str> {
    non_blank(self.tag.as_deref())
  }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}

/// One page of an ordered, filtered result set
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
  pub data: Vec<T>,
  pub current_page: usize,
  pub page_size: usize,
  pub total_records: usize,
  pub total_pages: usize,
}

impl<T> Page<T> {
  /// Slice an already ordered sequence; pages past the end are empty
  pub fn paginate(items: Vec<T>, page_number: usize, page_size: usize) -> Self {
    let total_records = items.len();
    let total_pages = total_records.div_ceil(page_size.max(1));
    let skip = page_number.saturating_sub(1).saturating_mul(page_size);
    let data = items.into_iter().skip(skip).take(page_size).collect();

    Self { data, current_page: page_number, page_size, total_records, total_pages }
  }

  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      data: self.data.into_iter().map(f).collect(),
      current_page: self.current_page,
      page_size: self.page_size,
      total_records: self.total_records,
      total_pages: self.total_pages,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_filter() {
    let filter = QueryFilter::default();
    assert_eq!(filter.page_number, 1);
    assert_eq!(filter.page_size, 5);
    assert_eq!(filter.mode, SearchMode::Semantic);
    assert!(filter.validate().is_ok());
  }

  #[test]
  fn test_zero_paging_is_rejected() {
    let filter = QueryFilter { page_number: 0, ..QueryFilter::default() };
    assert!(matches!(filter.validate(), Err(AnalyzerError::Validation(_))));

    let filter = QueryFilter { page_size: 0, ..QueryFilter::default() };
    assert!(matches!(filter.validate(), Err(AnalyzerError::Validation(_))));
  }

  #[test]
  fn test_blank_search_is_ignored() {
    let filter = QueryFilter { search: Some("   ".to_string()), ..QueryFilter::default() };
    assert_eq!(filter.search_term(), None);

    let filter = QueryFilter { search: Some("  slow login ".to_string()), ..QueryFilter::default() };
    assert_eq!(filter.search_term(), Some("slow login"));
  }

  #[test]
  fn test_paginate_twelve_records() {
    let items: Vec<u32> = (0..12).collect();

    let first = Page::paginate(items.clone(), 1, 5);
    assert_eq!(first.data, vec![0, 1, 2, 3, 4]);
    assert_eq!(first.total_pages, 3);

    let last = Page::paginate(items.clone(), 3, 5);
    assert_eq!(last.data, vec![10, 11]);

    let beyond = Page::paginate(items, 4, 5);
    assert!(beyond.data.is_empty());
    assert_eq!(beyond.total_records, 12);
    assert_eq!(beyond.total_pages, 3);
  }

  #[test]
  fn test_paginate_empty() {
    let page = Page::<u32>::paginate(Vec::new(), 1, 5);
    assert!(page.data.is_empty());
    assert_eq!(page.total_pages, 0);
  }
}
