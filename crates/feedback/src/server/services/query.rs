//! Paged feedback queries
//!
//! Ordering is decided once, up front: semantic rank when a search term is
//! present, otherwise newest first. Sentiment and tag filters only narrow
//! that ordering, and pagination slices the result.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AnalyzerResult;
use crate::server::middleware::RequestContext;
use crate::server::models::{FeedbackRecord, Page, QueryFilter, SearchMode};
use crate::server::services::embeddings::Embedder;
use crate::server::services::similarity::SimilarityRanker;
use crate::server::services::store::FeedbackRepository;

const COMPONENT: &str = "query";

/// Composes ranking, filtering and pagination over stored feedback
pub struct QueryEngine {
  embedder: Arc<dyn Embedder>,
  feedback: Arc<dyn FeedbackRepository>,
  ranker: SimilarityRanker,
}

impl QueryEngine {
  pub fn new(
    embedder: Arc<dyn Embedder>,
    feedback: Arc<dyn FeedbackRepository>,
    ranker: SimilarityRanker,
  ) -> Self {
    Self { embedder, feedback, ranker }
  }

  pub async fn query(
    &self,
    context: &RequestContext,
    filter: &QueryFilter,
  ) -> AnalyzerResult<Page<FeedbackRecord>> {
    filter.validate()?;

    let records = self.feedback.snapshot().await?;
    let ordered = match (filter.search_term(), filter.mode) {
      (Some(term), SearchMode::Semantic) => self.semantic_order(context, term, records).await?,
      (Some(term), SearchMode::Keyword) => keyword_matches(term, newest_first(records)),
      (None, _) => newest_first(records),
    };

    let filtered: Vec<FeedbackRecord> =
      ordered.into_iter().filter(|record| matches_attributes(record, filter)).collect();

    let page = Page::paginate(filtered, filter.page_number, filter.page_size);
    context.log_info(
      &format!(
        "Query returned {} of {} records (page {}/{})",
        page.data.len(),
        page.total_records,
        page.current_page,
        page.total_pages
      ),
      COMPONENT,
    );
    Ok(page)
  }

  /// Records restricted to the top-ranked ids, in rank order
  async fn semantic_order(
    &self,
    context: &RequestContext,
    term: &str,
    records: Vec<FeedbackRecord>,
  ) -> AnalyzerResult<Vec<FeedbackRecord>> {
    let query_vector = self.embedder.embed(context, term).await?;

    let ranked = self
      .ranker
      .rank(&query_vector, records.iter().map(|record| (record.id.as_str(), record.embedding.as_deref())));

    context.log_info(
      &format!("Semantic search kept {} of {} candidates", ranked.len(), records.len()),
      COMPONENT,
    );

    let mut by_id: HashMap<String, FeedbackRecord> =
      records.into_iter().map(|record| (record.id.clone(), record)).collect();

    Ok(ranked.into_iter().filter_map(|candidate| by_id.remove(&candidate.id)).collect())
  }
}

/// Stable sort, so records with equal timestamps keep insertion order
fn newest_first(mut records: Vec<FeedbackRecord>) -> Vec<FeedbackRecord> {
  records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  records
}

fn keyword_matches(term: &str, records: Vec<FeedbackRecord>) -> Vec<FeedbackRecord> {
  let needle = term.to_lowercase();
  records
    .into_iter()
    .filter(|record| {
      record.text.to_lowercase().contains(&needle)
        || record.analysis().summary.to_lowercase().contains(&needle)
    })
    .collect()
}

fn matches_attributes(record: &FeedbackRecord, filter: &QueryFilter) -> bool {
  let sentiment_ok = filter
    .sentiment_filter()
    .map_or(true, |wanted| record.analysis().sentiment.as_str().eq_ignore_ascii_case(wanted));

  let tag_ok = filter.tag_filter().map_or(true, |tag_id| record.has_tag(tag_id));

  sentiment_ok && tag_ok
}
