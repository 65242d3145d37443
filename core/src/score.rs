use crate::corpus::{Corpus, CorpusStats, DocId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

pub const DEFAULT_TOP_K: usize = 10;

/// BM25 term-saturation and length-normalization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    pub k1: f32,
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Bm25Params { k1: 1.5, b: 0.75 }
    }
}

/// Weights blending BM25 relevance with popularity signals. They need not
/// sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankWeights {
    /// BM25 sum weight.
    pub alpha: f32,
    /// Normalized-rating weight.
    pub beta: f32,
    /// Normalized-votes weight.
    pub gamma: f32,
}

impl Default for RankWeights {
    fn default() -> Self {
        RankWeights {
            alpha: 0.55,
            beta: 0.35,
            gamma: 0.10,
        }
    }
}

/// Inverse document frequency: `ln((N - df + 0.5) / (df + 0.5) + 1)`.
/// Non-negative for df in [0, N] and strictly decreasing in df.
pub fn idf(df: u32, document_count: u32) -> f32 {
    let n = document_count as f32;
    let df = df as f32;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// BM25 contribution of one term to one document.
///
/// A degenerate corpus with `average_doc_length == 0` treats the length
/// ratio as 1 instead of dividing by zero.
pub fn bm25_term(params: Bm25Params, tf: u32, df: u32, doc_length: u32, stats: &CorpusStats) -> f32 {
    let tf = tf as f32;
    let length_ratio = if stats.average_doc_length > 0.0 {
        doc_length as f32 / stats.average_doc_length
    } else {
        1.0
    };
    let numerator = tf * (params.k1 + 1.0);
    let denominator = tf + params.k1 * (1.0 - params.b + params.b * length_ratio);
    idf(df, stats.document_count) * (numerator / denominator)
}

/// Score and rank every document matching at least one query term.
///
/// BM25 contributions are summed per candidate across the query terms, then
/// blended with the document's popularity signals. Documents in `exclude`
/// never become candidates; documents matching no term are absent from the
/// result, not scored as zero. Ties are broken by ascending doc id so the
/// ranking is deterministic. Returns at most `top_k` (doc id, hybrid score)
/// pairs, best first.
pub fn rank(
    corpus: &Corpus,
    query_terms: &[String],
    exclude: &HashSet<DocId>,
    params: Bm25Params,
    weights: RankWeights,
    top_k: usize,
) -> Vec<(DocId, f32)> {
    if corpus.is_empty() {
        return Vec::new();
    }

    let mut bm25_sums: HashMap<DocId, f32> = HashMap::new();
    for term in query_terms {
        // Terms outside the vocabulary contribute nothing.
        let Some(postings) = corpus.index.get(term) else {
            continue;
        };
        let df = postings.len() as u32;
        for &doc_id in postings {
            if exclude.contains(&doc_id) {
                continue;
            }
            let doc = &corpus.documents[doc_id as usize];
            let contribution = bm25_term(params, doc.term_frequency(term), df, doc.doc_length, &corpus.stats);
            *bm25_sums.entry(doc_id).or_insert(0.0) += contribution;
        }
    }

    let mut scored: Vec<(DocId, f32)> = bm25_sums
        .into_iter()
        .map(|(doc_id, bm25_sum)| {
            let doc = &corpus.documents[doc_id as usize];
            let hybrid = weights.alpha * bm25_sum
                + weights.beta * doc.normalized_rating
                + weights.gamma * doc.normalized_votes;
            (doc_id, hybrid)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scored.truncate(top_k);
    scored
}
