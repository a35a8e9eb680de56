//! Process-wide, single-flight result cache
//!
//! Each fingerprint owns a slot. Callers for the same fingerprint share the
//! slot, so only one of them runs the computation while the rest wait for
//! its value. A failed computation leaves the slot empty; the slot stays in
//! place and the next caller, or one already waiting, computes into it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

type Slot<V> = Arc<OnceCell<V>>;

/// Write-once cache keyed by content fingerprint
pub struct ResultCache<V> {
  slots: Mutex<HashMap<String, Slot<V>>>,
}

impl<V> Default for ResultCache<V> {
  fn default() -> Self {
    Self { slots: Mutex::new(HashMap::new()) }
  }
}

impl<V: Clone> ResultCache<V> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Return the cached value, computing it once on a miss
  ///
  /// `compute` runs at most once concurrently per key. Errors are returned
  /// to the caller that ran the computation and are never stored.
  pub async fn get_or_try_compute<F, Fut, E>(&self, key: &str, compute: F) -> Result<V, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
  {
    let slot = self.slot(key).await;
    slot.get_or_try_init(compute).await.cloned()
  }

  /// Cached value for a key, if one has been stored
  pub async fn get(&self, key: &str) -> Option<V> {
    let slots = self.slots.lock().await;
    slots.get(key).and_then(|slot| slot.get().cloned())
  }

  /// Number of stored values
  pub async fn len(&self) -> usize {
    let slots = self.slots.lock().await;
    slots.values().filter(|slot| slot.initialized()).count()
  }

  pub async fn is_empty(&self) -> bool {
    self.len().await == 0
  }

  async fn slot(&self, key: &str) -> Slot<V> {
    let mut slots = self.slots.lock().await;
    slots.entry(key.to_string()).or_insert_with(|| Arc::new(OnceCell::new())).clone()
  }
}
