//! Cosine ranking over raw term-count rows.
//!
//! Rows are not normalized before comparison, so documents with more distinct
//! tokens lean towards higher scores regardless of weights. Changing that would
//! reorder results and is left alone on purpose.

use crate::error::{RecommendError, RecommendResult};
use crate::vectorize::CountMatrix;
use crate::{MovieIndex, TermId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scored {
    pub index: MovieIndex,
    pub score: f64,
}

/// Dot product of two rows sorted by term id.
pub fn dot(a: &[(TermId, u32)], b: &[(TermId, u32)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0f64;
    while i < a.len() && j < b.len() {
        let (ta, ca) = a[i];
        let (tb, cb) = b[j];
        if ta == tb {
            sum += ca as f64 * cb as f64;
            i += 1;
            j += 1;
        } else if ta < tb {
            i += 1;
        } else {
            j += 1;
        }
    }
    sum
}

pub fn norm(a: &[(TermId, u32)]) -> f64 {
    a.iter().map(|(_, c)| (*c as f64) * (*c as f64)).sum::<f64>().sqrt()
}

/// Cosine similarity, 0.0 when either side is a zero vector.
pub fn cosine(a: &[(TermId, u32)], b: &[(TermId, u32)]) -> f64 {
    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        return 0.0;
    }
    (dot(a, b) / denom).clamp(0.0, 1.0)
}

/// Score every row against `query_index` (itself included) and sort by score, highest first.
///
/// Equal scores keep catalog order.
pub fn rank(matrix: &CountMatrix, query_index: MovieIndex) -> RecommendResult<Vec<Scored>> {
    let query = matrix
        .row(query_index)
        .ok_or(RecommendError::IndexOutOfRange { index: query_index, len: matrix.num_rows() })?;
    let mut scored: Vec<Scored> = matrix
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| Scored { index, score: cosine(query, row) })
        .collect();
    // stable: ties stay in catalog order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(scored)
}
