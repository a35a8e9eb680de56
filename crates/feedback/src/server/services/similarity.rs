//! Cosine-similarity ranking of stored vectors against a query vector

use crate::config::DEFAULT_TOP_K;

/// A candidate's score during ranking
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
  pub id: String,
  pub score: f32,
}

/// Calculate cosine similarity between two embeddings
///
/// Zero-length vectors, zero norms and mismatched dimensions score 0 so the
/// ordering stays total.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
  if a.len() != b.len() || a.is_empty() {
    return 0.0;
  }

  let (dot, norm_a, norm_b) = a.iter().zip(b.iter()).fold((0.0f64, 0.0f64, 0.0f64), |(dot, na, nb), (x, y)| {
    let (x, y) = (f64::from(*x), f64::from(*y));
    (dot + x * y, na + x * x, nb + y * y)
  });

  if norm_a == 0.0 || norm_b == 0.0 {
    return 0.0;
  }

  let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
  if similarity.is_nan() {
    0.0
  } else {
    similarity.clamp(-1.0, 1.0) as f32
  }
}

/// Orders candidates by similarity and keeps the best `top_k`
#[derive(Debug, Clone, Copy)]
pub struct SimilarityRanker {
  top_k: usize,
}

impl Default for SimilarityRanker {
  fn default() -> Self {
    Self::new(DEFAULT_TOP_K)
  }
}

impl SimilarityRanker {
  pub fn new(top_k: usize) -> Self {
    Self { top_k }
  }

  pub fn top_k(&self) -> usize {
    self.top_k
  }

  /// Rank candidates, highest similarity first
  ///
  /// Candidates without a vector are skipped. Equal scores keep their input
  /// order.
  pub fn rank<'a, I>(&self, query: &[f32], candidates: I) -> Vec<RankedCandidate>
  where
    I: IntoIterator<Item = (&'a str, Option<&'a [f32]>)>,
  {
    let mut scored: Vec<RankedCandidate> = candidates
      .into_iter()
      .filter_map(|(id, vector)| {
        vector.map(|vector| RankedCandidate { id: id.to_string(), score: cosine_similarity(query, vector) })
      })
      .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(self.top_k);
    scored
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
  }

  #[test]
  fn test_self_similarity_is_one() {
    let v = [0.3, -1.2, 4.5, 0.0];
    assert!(approx(cosine_similarity(&v, &v), 1.0));
  }

  #[test]
  fn test_similarity_is_symmetric_and_bounded() {
    let pairs: [(&[f32], &[f32]); 4] = [
      (&[1.0, 2.0, 3.0], &[-3.0, 0.5, 2.0]),
      (&[1.0, 0.0], &[-1.0, 0.0]),
      (&[0.1, 0.1], &[100.0, 100.0]),
      (&[5.0, -2.0, 0.5], &[0.0, 0.0, 1.0]),
    ];

    for (a, b) in pairs {
      let ab = cosine_similarity(a, b);
      let ba = cosine_similarity(b, a);
      assert_eq!(ab, ba);
      assert!((-1.0..=1.0).contains(&ab));
    }
  }

  #[test]
  fn test_opposite_vectors() {
    assert!(approx(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), -1.0));
  }

  #[test]
  fn test_zero_norm_is_zero_not_nan() {
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    assert_eq!(cosine_similarity(&[], &[]), 0.0);
  }

  #[test]
  fn test_mismatched_dimensions_score_zero() {
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
  }

  #[test]
  fn test_rank_orders_by_similarity() {
    let a = [1.0, 0.0];
    let b = [0.0, 1.0];
    let ranker = SimilarityRanker::new(2);

    let ranked = ranker.rank(&[1.0, 0.0], [("b", Some(&b[..])), ("a", Some(&a[..]))]);
    let ids: Vec<&str> = ranked.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(ranked[0].score > ranked[1].score);
  }

  #[test]
  fn test_rank_skips_missing_vectors_and_truncates() {
    let close = [0.9, 0.1];
    let closer = [1.0, 0.0];
    let far = [0.0, 1.0];
    let ranker = SimilarityRanker::new(2);

    let ranked = ranker.rank(
      &[1.0, 0.0],
      [("far", Some(&far[..])), ("none", None), ("close", Some(&close[..])), ("closer", Some(&closer[..]))],
    );
    let ids: Vec<&str> = ranked.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["closer", "close"]);
  }

  #[test]
  fn test_rank_ties_keep_input_order() {
    let v = [1.0, 1.0];
    let ranker = SimilarityRanker::new(10);
    let ranked = ranker.rank(&[1.0, 1.0], [("first", Some(&v[..])), ("second", Some(&v[..])), ("third", Some(&v[..]))]);
    let ids: Vec<&str> = ranked.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second", "third"]);
  }

  #[test]
  fn test_rank_without_scorable_candidates_is_empty() {
    let ranker = SimilarityRanker::default();
    assert!(ranker.rank(&[1.0], Vec::<(&str, Option<&[f32]>)>::new()).is_empty());
    assert!(ranker.rank(&[1.0], [("none", None)]).is_empty());
  }

  #[test]
  fn test_default_top_k_is_two() {
    assert_eq!(SimilarityRanker::default().top_k(), 2);
  }
}
