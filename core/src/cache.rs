//! Vectorized corpora keyed by weight tuple.
//!
//! A corpus is only valid for the weights it was combined with, so the key is
//! the full `Weights` value. Entries are immutable once built and are handed
//! out behind `Arc`.

use crate::catalog::Catalog;
use crate::combine::{combine_all, WeightedProfile};
use crate::config::CombinerConfig;
use crate::error::RecommendResult;
use crate::vectorize::{vectorize, CountMatrix, Vocabulary};
use crate::Weights;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Profiles, vocabulary and count matrix of the whole catalog under one set of weights.
#[derive(Debug, Clone)]
pub struct WeightedCorpus {
    pub weights: Weights,
    pub profiles: Vec<WeightedProfile>,
    pub vocabulary: Vocabulary,
    pub matrix: CountMatrix,
}

impl WeightedCorpus {
    pub fn build(catalog: &Catalog, weights: Weights, config: &CombinerConfig) -> RecommendResult<Self> {
        let profiles = combine_all(catalog.records(), weights, config);
        let texts: Vec<&str> = profiles.iter().map(|p| p.combined_text.as_str()).collect();
        let (vocabulary, matrix) = vectorize(&texts)?;
        Ok(Self { weights, profiles, vocabulary, matrix })
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<Weights, Arc<WeightedCorpus>>,
    // insertion order, oldest first
    order: VecDeque<Weights>,
}

pub struct VectorCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl VectorCache {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, inner: Mutex::new(Inner::default()) }
    }

    pub fn capacity(&self) -> usize { self.capacity }
    pub fn len(&self) -> usize { self.inner.lock().entries.len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn get(&self, weights: &Weights) -> Option<Arc<WeightedCorpus>> {
        self.inner.lock().entries.get(weights).cloned()
    }

    /// Cached corpus for `weights`, or the result of `build`.
    ///
    /// `build` runs without the lock held. Failed builds are not cached.
    pub fn get_or_build<F>(&self, weights: Weights, build: F) -> RecommendResult<Arc<WeightedCorpus>>
    where
        F: FnOnce() -> RecommendResult<WeightedCorpus>,
    {
        if let Some(hit) = self.get(&weights) {
            tracing::debug!(?weights, "vector cache hit");
            return Ok(hit);
        }
        let built = Arc::new(build()?);
        if self.capacity == 0 {
            return Ok(built);
        }

        let mut inner = self.inner.lock();
        if let Some(existing) = inner.entries.get(&weights) {
            return Ok(existing.clone());
        }
        while inner.entries.len() >= self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
        inner.entries.insert(weights, built.clone());
        inner.order.push_back(weights);
        Ok(built)
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MovieRecord;

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            MovieRecord::new("A", "Drama", "Dir One", "Cast One"),
            MovieRecord::new("B", "Comedy", "Dir Two", "Cast Two"),
        ])
        .unwrap()
    }

    fn w(c: i64) -> Weights { Weights::new(c, 1, 1).unwrap() }

    #[test]
    fn reuses_entry_for_same_weights() {
        let cat = catalog();
        let cache = VectorCache::new(4);
        let cfg = CombinerConfig::default();
        let a = cache.get_or_build(w(1), || WeightedCorpus::build(&cat, w(1), &cfg)).unwrap();
        let b = cache
            .get_or_build(w(1), || panic!("should not rebuild"))
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert_eq!(a.profiles.len(), 2);
        assert_eq!(a.profiles[0].combined_text, "Cast_One Cast_One Drama Dir_One ");
    }

    #[test]
    fn evicts_oldest_when_full() {
        let cat = catalog();
        let cache = VectorCache::new(2);
        let cfg = CombinerConfig::default();
        for c in 1..=3 {
            cache.get_or_build(w(c), || WeightedCorpus::build(&cat, w(c), &cfg)).unwrap();
        }
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&w(1)).is_none());
        assert!(cache.get(&w(3)).is_some());
    }

    #[test]
    fn zero_capacity_never_stores() {
        let cat = catalog();
        let cache = VectorCache::new(0);
        let cfg = CombinerConfig::default();
        cache.get_or_build(w(2), || WeightedCorpus::build(&cat, w(2), &cfg)).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_drops_every_entry() {
        let cat = catalog();
        let cache = VectorCache::new(3);
        let cfg = CombinerConfig::default();
        let built = cache.get_or_build(w(4), || WeightedCorpus::build(&cat, w(4), &cfg)).unwrap();
        assert_eq!(built.weights, w(4));
        assert_eq!(built.vocabulary.len(), built.matrix.dim());
        assert_eq!(cache.capacity(), 3);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&w(4)).is_none());
    }
}
