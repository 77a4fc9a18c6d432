use crate::error::{RecommendError, RecommendResult};
use crate::tokenizer::tokenize;
use crate::TermId;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Token to term id, ids assigned in sorted token order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: BTreeMap<String, TermId>,
}

impl Vocabulary {
    pub fn len(&self) -> usize { self.terms.len() }
    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
    pub fn get(&self, term: &str) -> Option<TermId> { self.terms.get(term).copied() }
}

/// Raw term counts of one document, sorted by term id, zero counts omitted.
pub type SparseRow = Vec<(TermId, u32)>;

/// One sparse count row per document, all over the same vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMatrix {
    rows: Vec<SparseRow>,
    dim: usize,
}

impl CountMatrix {
    pub fn num_rows(&self) -> usize { self.rows.len() }
    pub fn dim(&self) -> usize { self.dim }
    pub fn row(&self, i: usize) -> Option<&[(TermId, u32)]> { self.rows.get(i).map(|r| r.as_slice()) }
    pub fn rows(&self) -> &[SparseRow] { &self.rows }
}

/// Build a vocabulary over the whole corpus and count every document against it.
///
/// Fails when the corpus holds no token at all.
pub fn vectorize<S: AsRef<str>>(corpus: &[S]) -> RecommendResult<(Vocabulary, CountMatrix)> {
    let docs: Vec<Vec<String>> = corpus.iter().map(|d| tokenize(d.as_ref())).collect();

    let distinct: BTreeSet<&str> = docs.iter().flatten().map(String::as_str).collect();
    if distinct.is_empty() {
        return Err(RecommendError::Vectorization(format!(
            "empty vocabulary across {} documents",
            corpus.len()
        )));
    }
    let terms: BTreeMap<String, TermId> = distinct
        .into_iter()
        .enumerate()
        .map(|(id, t)| (t.to_string(), id as TermId))
        .collect();
    let vocab = Vocabulary { terms };

    let mut rows = Vec::with_capacity(docs.len());
    for tokens in &docs {
        let mut counts: HashMap<TermId, u32> = HashMap::new();
        for tok in tokens {
            if let Some(tid) = vocab.get(tok) {
                *counts.entry(tid).or_insert(0) += 1;
            }
        }
        let mut row: SparseRow = counts.into_iter().collect();
        row.sort_unstable_by_key(|(tid, _)| *tid);
        rows.push(row);
    }

    tracing::debug!(num_docs = rows.len(), num_terms = vocab.len(), "vectorized corpus");
    let dim = vocab.len();
    Ok((vocab, CountMatrix { rows, dim }))
}
