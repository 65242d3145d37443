use crate::corpus::{Corpus, DocId};
use crate::score::{rank, Bm25Params, RankWeights};
use crate::tokenizer::tokenize;
use serde::Serialize;
use std::collections::HashSet;

/// A pseudo-query derived from a user's favorite movies: the concatenated
/// document text of every matched favorite, plus the ids to keep out of the
/// results.
#[derive(Debug, Default)]
pub struct FavoriteQuery {
    pub terms: Vec<String>,
    pub exclude: HashSet<DocId>,
    /// Favorites with no exact (title, year) match. They contribute nothing;
    /// the caller decides whether to tell the user.
    pub unmatched: usize,
}

/// Resolve `(title, year)` favorites against the corpus. Titles are matched
/// on the lowercased, trimmed form and the year on exact text equality.
/// When several documents share a favorite's title and year, all of them
/// contribute text and all are excluded.
pub fn build_query(corpus: &Corpus, favorites: &[(String, String)]) -> FavoriteQuery {
    let mut query = FavoriteQuery::default();
    for (title, year) in favorites {
        let key_title = title.trim().to_lowercase();
        let key_year = year.trim();
        let ids = corpus.matches(&key_title, key_year);
        if ids.is_empty() {
            query.unmatched += 1;
            continue;
        }
        for &doc_id in ids {
            if let Some(doc) = corpus.document(doc_id) {
                query.terms.extend(tokenize(&doc.combined_text));
                query.exclude.insert(doc_id);
            }
        }
    }
    query
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub doc_id: DocId,
    pub title: String,
    pub year: String,
    pub score: f32,
}

#[derive(Debug, Serialize)]
pub struct Recommendations {
    pub results: Vec<Recommendation>,
    pub unmatched_favorites: usize,
    pub query_terms: usize,
}

/// Full read-only recommendation pass: favorites -> pseudo-query -> hybrid
/// ranking. Favorites themselves never appear in the output.
pub fn recommend(
    corpus: &Corpus,
    favorites: &[(String, String)],
    params: Bm25Params,
    weights: RankWeights,
    top_k: usize,
) -> Recommendations {
    let query = build_query(corpus, favorites);
    let hits = rank(corpus, &query.terms, &query.exclude, params, weights, top_k);
    let results = hits
        .into_iter()
        .filter_map(|(doc_id, score)| {
            corpus.document(doc_id).map(|doc| Recommendation {
                doc_id,
                title: doc.title_raw.clone(),
                year: doc.year.clone(),
                score,
            })
        })
        .collect();
    Recommendations {
        results,
        unmatched_favorites: query.unmatched,
        query_terms: query.terms.len(),
    }
}
