//! Shared application state wired from configuration

use std::sync::Arc;

use crate::config::{ProviderConfig, RetrievalConfig};
use crate::error::AnalyzerResult;
use crate::server::models::Classification;
use crate::server::services::{
  cache::ResultCache,
  classification::{ClassificationClient, Classifier},
  embeddings::{EmbeddingClient, Embedder},
  intake::IntakePipeline,
  query::QueryEngine,
  similarity::SimilarityRanker,
  store::{FeedbackRepository, InMemoryStore, TagRepository},
};

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
  pub intake: Arc<IntakePipeline>,
  pub query: Arc<QueryEngine>,
  pub feedback: Arc<dyn FeedbackRepository>,
  pub tags: Arc<dyn TagRepository>,
  pub cache: Arc<ResultCache<Classification>>,
}

impl AppState {
  /// Wire the HTTP provider clients to a fresh in-memory store
  pub fn from_config(provider: &ProviderConfig, retrieval: &RetrievalConfig) -> AnalyzerResult<Self> {
    let cache = Arc::new(ResultCache::new());
    let classifier = Arc::new(ClassificationClient::with_cache(provider.clone(), cache.clone())?);
    let embedder = Arc::new(EmbeddingClient::new(provider.clone())?);
    let store = Arc::new(InMemoryStore::new());

    Ok(Self::assemble(classifier, embedder, store.clone(), store, cache, SimilarityRanker::new(retrieval.top_k)))
  }

  /// Wire arbitrary service implementations together
  pub fn assemble(
    classifier: Arc<dyn Classifier>,
    embedder: Arc<dyn Embedder>,
    feedback: Arc<dyn FeedbackRepository>,
    tags: Arc<dyn TagRepository>,
    cache: Arc<ResultCache<Classification>>,
    ranker: SimilarityRanker,
  ) -> Self {
    let intake = IntakePipeline::new(classifier, embedder.clone(), feedback.clone(), tags.clone());
    let query = QueryEngine::new(embedder, feedback.clone(), ranker);

    Self { intake: Arc::new(intake), query: Arc::new(query), feedback, tags, cache }
  }
}
