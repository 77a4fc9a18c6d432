//! Query orchestration: title lookup, weighted vectorization, ranking, top-N.

use crate::cache::{VectorCache, WeightedCorpus};
use crate::catalog::Catalog;
use crate::config::RecommenderConfig;
use crate::error::{RecommendError, RecommendResult};
use crate::similarity::{rank, Scored};
use crate::{MovieIndex, Weights};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// 1-based position in the output.
    pub rank: usize,
    pub index: MovieIndex,
    pub title: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub selected_index: MovieIndex,
    pub selected: String,
    pub weights: Weights,
    pub results: Vec<Recommendation>,
}

pub struct Recommender {
    catalog: Arc<Catalog>,
    config: RecommenderConfig,
    cache: VectorCache,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>, config: RecommenderConfig) -> RecommendResult<Self> {
        config.validate()?;
        let cache = VectorCache::new(config.cache_capacity);
        Ok(Self { catalog, config, cache })
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }
    pub fn config(&self) -> &RecommenderConfig { &self.config }

    /// Exact, case-insensitive title check.
    pub fn validate_title(&self, title: &str) -> bool {
        self.catalog.contains_title(title.trim())
    }

    /// Catalog index of the first record titled `title`.
    pub fn lookup(&self, title: &str) -> RecommendResult<MovieIndex> {
        let title = title.trim();
        if title.is_empty() {
            return Err(RecommendError::EmptyTitle);
        }
        self.catalog
            .find_title(title)
            .ok_or_else(|| RecommendError::TitleNotFound(title.to_string()))
    }

    /// Combined texts and count matrix of the whole catalog for `weights`.
    pub fn corpus(&self, weights: Weights) -> RecommendResult<Arc<WeightedCorpus>> {
        self.cache.get_or_build(weights, || {
            WeightedCorpus::build(&self.catalog, weights, &self.config.combiner)
        })
    }

    /// Full ranking of the catalog against one movie, the movie itself included.
    pub fn rank_index(&self, index: MovieIndex, weights: Weights) -> RecommendResult<Vec<Scored>> {
        let corpus = self.corpus(weights)?;
        rank(&corpus.matrix, index)
    }

    /// Top `config.top_n` movies most similar to `title`.
    pub fn run_query(&self, title: &str, weights: Weights) -> RecommendResult<Recommendations> {
        self.run_query_top(title, weights, self.config.top_n)
    }

    pub fn run_query_top(&self, title: &str, weights: Weights, top_n: usize) -> RecommendResult<Recommendations> {
        let index = self.lookup(title)?;
        self.recommend_for(index, weights, top_n)
    }

    fn recommend_for(&self, index: MovieIndex, weights: Weights, top_n: usize) -> RecommendResult<Recommendations> {
        let ranked = self.rank_index(index, weights)?;
        let mut results = Vec::with_capacity(top_n.min(ranked.len()));
        // skip the query movie by index, not by position
        for s in ranked.into_iter().filter(|s| s.index != index).take(top_n) {
            results.push(Recommendation {
                rank: results.len() + 1,
                index: s.index,
                title: self.catalog.title_of(s.index)?.to_string(),
                score: s.score,
            });
        }
        let selected = self.catalog.title_of(index)?.to_string();
        tracing::info!(
            selected = %selected,
            cast = weights.cast(),
            genre = weights.genre(),
            director = weights.director(),
            num_results = results.len(),
            "query resolved"
        );
        Ok(Recommendations { selected_index: index, selected, weights, results })
    }
}

/// Where a query stands.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    AwaitingInput,
    Validating { title: String },
    Ranking { index: MovieIndex, weights: Weights },
    Resolved(Recommendations),
    Rejected { message: String },
}

impl QueryState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueryState::Resolved(_) | QueryState::Rejected { .. })
    }
}

/// Drives one query through its states for front ends that render each of them.
pub struct QuerySession<'a> {
    recommender: &'a Recommender,
    state: QueryState,
}

impl<'a> QuerySession<'a> {
    pub fn new(recommender: &'a Recommender) -> Self {
        Self { recommender, state: QueryState::AwaitingInput }
    }

    pub fn state(&self) -> &QueryState { &self.state }

    /// Run a submission to a terminal state. An empty title leaves the session waiting.
    pub fn submit(&mut self, title: &str, weights: Weights) -> &QueryState {
        if title.trim().is_empty() {
            self.state = QueryState::AwaitingInput;
            return &self.state;
        }
        self.state = QueryState::Validating { title: title.to_string() };

        let index = match self.recommender.lookup(title) {
            Ok(index) => index,
            Err(err) => return self.reject(err),
        };
        self.state = QueryState::Ranking { index, weights };
        tracing::debug!(index, ?weights, "ranking");

        let top_n = self.recommender.config.top_n;
        self.state = match self.recommender.recommend_for(index, weights, top_n) {
            Ok(recs) => QueryState::Resolved(recs),
            Err(err) => return self.reject(err),
        };
        &self.state
    }

    fn reject(&mut self, err: RecommendError) -> &QueryState {
        tracing::info!(error = %err, "query rejected");
        self.state = QueryState::Rejected { message: err.user_message() };
        &self.state
    }
}
