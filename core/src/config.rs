//! Recommender configuration.

use crate::error::{RecommendError, RecommendResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MAX_CAST_ENTRIES: usize = 20;
pub const MAX_GENRE_ENTRIES: usize = 10;
pub const MAX_CAST_MULTIPLIER: usize = 10;

/// How a record's attributes are turned into combined text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinerConfig {
    /// Leading cast entries kept per movie.
    pub max_cast: usize,

    /// Leading genre entries kept per movie.
    pub max_genres: usize,

    /// Cast block repetitions per unit of cast weight.
    pub cast_multiplier: usize,
}

impl Default for CombinerConfig {
    fn default() -> Self {
        Self { max_cast: 3, max_genres: 2, cast_multiplier: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Number of recommendations returned per query.
    pub top_n: usize,

    pub combiner: CombinerConfig,

    /// Weight tuples whose vectorized corpus is kept around. 0 disables caching.
    pub cache_capacity: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self { top_n: 10, combiner: CombinerConfig::default(), cache_capacity: 16 }
    }
}

impl RecommenderConfig {
    /// Load a JSON config file. Keys left out keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RecommendResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: RecommenderConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn without_cache(self) -> Self {
        self.with_cache_capacity(0)
    }

    pub fn with_combiner(mut self, combiner: CombinerConfig) -> Self {
        self.combiner = combiner;
        self
    }

    pub fn validate(&self) -> RecommendResult<()> {
        if self.top_n == 0 {
            return Err(RecommendError::Config("top_n must be at least 1".into()));
        }
        let c = &self.combiner;
        if !(1..=MAX_CAST_ENTRIES).contains(&c.max_cast) {
            return Err(RecommendError::Config(format!("max_cast must be between 1 and {MAX_CAST_ENTRIES}")));
        }
        if !(1..=MAX_GENRE_ENTRIES).contains(&c.max_genres) {
            return Err(RecommendError::Config(format!("max_genres must be between 1 and {MAX_GENRE_ENTRIES}")));
        }
        if !(1..=MAX_CAST_MULTIPLIER).contains(&c.cast_multiplier) {
            return Err(RecommendError::Config(format!("cast_multiplier must be between 1 and {MAX_CAST_MULTIPLIER}")));
        }
        Ok(())
    }
}
