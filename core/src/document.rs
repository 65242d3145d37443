use crate::corpus::DocId;
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};

/// Sentinel used by the snapshot format for a missing genres/cast field.
pub const MISSING_SENTINEL: &str = "\\N";

/// One well-formed row of the movie snapshot, before normalization.
///
/// Rows missing rating, votes, or year never become a `RawRecord`; the
/// indexer filters them out while parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub primary_title: String,
    pub original_title: String,
    pub year: String,
    /// Comma-separated genre list, or the missing sentinel.
    pub genres: String,
    /// Comma-separated cast names, or the missing sentinel.
    pub cast_names: String,
    pub average_rating: f32,
    pub num_votes: u64,
}

/// A normalized, searchable movie document. Immutable once the owning corpus
/// is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    /// Upstream key (e.g. "tt0111161"), kept for diagnostics and lookups.
    pub external_id: String,
    pub title_raw: String,
    pub title_normalized: String,
    pub original_title: Option<String>,
    /// Kept as text to tolerate non-numeric sentinels upstream.
    pub year: String,
    pub genre_tokens: Vec<String>,
    pub cast_tokens: Vec<String>,
    /// title_normalized + genres + cast, space-joined in that order. The
    /// unit of tokenization for both indexing and term-frequency counting.
    pub combined_text: String,
    pub doc_length: u32,
    pub average_rating: f32,
    pub num_votes: u64,
    /// Filled in by the corpus builder relative to corpus-wide maxima.
    pub normalized_rating: f32,
    pub normalized_votes: f32,
}

impl Document {
    /// Normalize one snapshot record. Pure: the same record always produces
    /// the same document.
    pub fn from_record(id: DocId, record: RawRecord) -> Self {
        let title_raw = record.primary_title.trim().to_string();
        let title_normalized = title_raw.to_lowercase();

        // Token order is preserved as encountered; duplicates are kept.
        let genre_tokens: Vec<String> = split_list(&record.genres)
            .map(|g| g.to_lowercase())
            .collect();
        let cast_tokens: Vec<String> = split_list(&record.cast_names)
            .map(|name| {
                name.chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .to_lowercase()
            })
            .collect();

        let mut combined_text = title_normalized.clone();
        for token in genre_tokens.iter().chain(cast_tokens.iter()) {
            combined_text.push(' ');
            combined_text.push_str(token);
        }
        let doc_length = tokenize(&combined_text).len() as u32;

        let original_title = match record.original_title.trim() {
            "" | "N/A" | MISSING_SENTINEL => None,
            other => Some(other.to_string()),
        };

        Document {
            id,
            external_id: record.id,
            title_raw,
            title_normalized,
            original_title,
            year: record.year.trim().to_string(),
            genre_tokens,
            cast_tokens,
            combined_text,
            doc_length,
            average_rating: record.average_rating,
            num_votes: record.num_votes,
            normalized_rating: 0.0,
            normalized_votes: 0.0,
        }
    }

    /// Raw count of exact-token matches in `combined_text`. Recomputed per
    /// query; the index stores membership only.
    pub fn term_frequency(&self, term: &str) -> u32 {
        self.combined_text
            .split_whitespace()
            .filter(|t| *t == term)
            .count() as u32
    }
}

/// Split a comma-separated snapshot field, treating the sentinel as empty.
fn split_list(field: &str) -> impl Iterator<Item = &str> {
    let field = match field.trim() {
        MISSING_SENTINEL => "",
        other => other,
    };
    field
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
}
