//! Weighted combination of a movie's attributes into one document.
//!
//! Each attribute block is repeated in proportion to its weight, so the weight
//! ends up as term frequency once the text is vectorized.

use crate::config::CombinerConfig;
use crate::error::{RecommendError, RecommendResult};
use crate::{Field, MovieRecord, Weights};

/// Combined text of one record under one set of weights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedProfile {
    pub combined_text: String,
}

/// Combine a record, degrading to empty text when the record is malformed.
pub fn combine(record: &MovieRecord, weights: Weights, config: &CombinerConfig) -> String {
    match try_combine(record, weights, config) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(title = %record.title, error = %err, "cannot combine record, using empty text");
            String::new()
        }
    }
}

/// Cast block `weight * cast_multiplier` times, then genres `weight` times, then director
/// `weight` times; every repetition is followed by a space.
pub fn try_combine(record: &MovieRecord, weights: Weights, config: &CombinerConfig) -> RecommendResult<String> {
    let cast = text_of(record, "cast", &record.cast)?;
    let genre = text_of(record, "genre", &record.genre)?;
    let director = text_of(record, "director", &record.director)?;

    let cast = cast
        .split(',')
        .take(config.max_cast)
        .map(|c| c.trim().replace(' ', "_"))
        .collect::<Vec<_>>()
        .join(" ");
    let genres = genre
        .split(',')
        .take(config.max_genres)
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");
    let director = director.replace(' ', "_");

    let cast_reps = (weights.cast() as usize)
        .checked_mul(config.cast_multiplier)
        .ok_or_else(|| RecommendError::Config(format!("cast_multiplier {} overflows", config.cast_multiplier)))?;
    let genre_reps = weights.genre() as usize;
    let director_reps = weights.director() as usize;

    let mut out = String::new();
    push_repeated(&mut out, &cast, cast_reps);
    push_repeated(&mut out, &genres, genre_reps);
    push_repeated(&mut out, &director, director_reps);
    Ok(out)
}

/// Combine every record in catalog order.
pub fn combine_all(records: &[MovieRecord], weights: Weights, config: &CombinerConfig) -> Vec<WeightedProfile> {
    records
        .iter()
        .map(|r| WeightedProfile { combined_text: combine(r, weights, config) })
        .collect()
}

fn text_of<'a>(record: &MovieRecord, name: &'static str, field: &'a Field) -> RecommendResult<&'a str> {
    field
        .as_text()
        .ok_or_else(|| RecommendError::MalformedRecord { title: record.title.clone(), field: name })
}

fn push_repeated(out: &mut String, block: &str, times: usize) {
    for _ in 0..times {
        out.push_str(block);
        out.push(' ');
    }
}
