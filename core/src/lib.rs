use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod cache;
pub mod catalog;
pub mod combine;
pub mod config;
pub mod error;
pub mod recommend;
pub mod similarity;
pub mod tokenizer;
pub mod vectorize;

pub use catalog::Catalog;
pub use config::{CombinerConfig, RecommenderConfig};
pub use error::{RecommendError, RecommendResult};
pub use recommend::{QuerySession, QueryState, Recommendation, Recommendations, Recommender};

pub type TermId = u32;
/// Position of a record in the catalog. Stable for the catalog's lifetime.
pub type MovieIndex = usize;

pub const MIN_WEIGHT: u8 = 1;
pub const MAX_WEIGHT: u8 = 5;

/// One attribute of a movie record as it came out of the source data.
///
/// Missing values and `null` become empty text on load. Anything that is not a
/// string is kept as `Invalid` so the combiner can flag the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Field {
    Text(String),
    Invalid(Value),
}

impl Field {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Text(s) => Some(s),
            Field::Invalid(_) => None,
        }
    }
}

impl Default for Field {
    fn default() -> Self { Field::Text(String::new()) }
}

impl From<Value> for Field {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Field::Text(String::new()),
            Value::String(s) => Field::Text(s),
            other => Field::Invalid(other),
        }
    }
}

impl From<Field> for Value {
    fn from(f: Field) -> Self {
        match f {
            Field::Text(s) => Value::String(s),
            Field::Invalid(v) => v,
        }
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self { Field::Text(s.to_string()) }
}

impl From<String> for Field {
    fn from(s: String) -> Self { Field::Text(s) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    /// Comma-separated genre list.
    #[serde(default)]
    pub genre: Field,
    #[serde(default)]
    pub director: Field,
    /// Comma-separated cast list, billing order.
    #[serde(default)]
    pub cast: Field,
}

impl MovieRecord {
    pub fn new(title: impl Into<String>, genre: impl Into<Field>, director: impl Into<Field>, cast: impl Into<Field>) -> Self {
        Self { title: title.into(), genre: genre.into(), director: director.into(), cast: cast.into() }
    }
}

/// Importance of each feature, every value in `MIN_WEIGHT..=MAX_WEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Weights {
    cast: u8,
    genre: u8,
    director: u8,
}

impl Weights {
    pub fn new(cast: i64, genre: i64, director: i64) -> RecommendResult<Self> {
        Ok(Self {
            cast: check_weight("cast", cast)?,
            genre: check_weight("genre", genre)?,
            director: check_weight("director", director)?,
        })
    }

    pub fn cast(&self) -> u8 { self.cast }
    pub fn genre(&self) -> u8 { self.genre }
    pub fn director(&self) -> u8 { self.director }
}

impl Default for Weights {
    fn default() -> Self { Self { cast: MIN_WEIGHT, genre: MIN_WEIGHT, director: MIN_WEIGHT } }
}

fn check_weight(feature: &'static str, value: i64) -> RecommendResult<u8> {
    if value < MIN_WEIGHT as i64 || value > MAX_WEIGHT as i64 {
        return Err(RecommendError::InvalidWeight { feature, value, min: MIN_WEIGHT, max: MAX_WEIGHT });
    }
    Ok(value as u8)
}
