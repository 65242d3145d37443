use crate::document::{Document, RawRecord};
use crate::tokenizer::tokenize;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub type DocId = u32;

/// Term -> ids of documents containing it at least once. Postings are sorted
/// ascending and deduplicated; term frequencies are not stored here.
///
/// `BTreeMap` keeps the serialized form byte-identical across rebuilds from
/// the same snapshot.
pub type InvertedIndex = BTreeMap<String, Vec<DocId>>;

/// (normalized title, year) -> all matching doc ids. Duplicate releases under
/// the same title and year are all retained.
pub type TitleIndex = BTreeMap<(String, String), Vec<DocId>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub document_count: u32,
    /// Arithmetic mean of doc lengths; 0.0 for an empty corpus.
    pub average_doc_length: f32,
    pub max_rating: f32,
    pub max_votes: u64,
}

/// The finalized, read-only snapshot answering all queries: documents plus
/// the derived indexes and statistics. Built once from a static record set;
/// rebuilding means constructing a new value and swapping it via
/// [`CorpusHandle`], never mutating in place.
#[derive(Debug)]
pub struct Corpus {
    /// Indexed by `DocId`; ids are assigned densely in input order.
    pub documents: Vec<Document>,
    pub index: InvertedIndex,
    pub titles: TitleIndex,
    pub stats: CorpusStats,
}

impl Corpus {
    /// Normalize raw snapshot records and build the corpus in one shot.
    pub fn build(records: Vec<RawRecord>) -> Corpus {
        let documents = records
            .into_iter()
            .enumerate()
            .map(|(id, record)| Document::from_record(id as DocId, record))
            .collect();
        Corpus::from_documents(documents)
    }

    /// Build the inverted index, title index, and corpus statistics from an
    /// already-normalized document set. Single pass; deterministic:
    /// rebuilding from an identical document set yields identical indexes
    /// and statistics.
    pub fn from_documents(mut documents: Vec<Document>) -> Corpus {
        let mut index: InvertedIndex = BTreeMap::new();
        let mut titles: TitleIndex = BTreeMap::new();
        let mut total_length: u64 = 0;
        let mut max_rating: f32 = 0.0;
        let mut max_votes: u64 = 0;

        for doc in &documents {
            for term in tokenize(&doc.combined_text) {
                let postings = index.entry(term).or_default();
                // Documents arrive in ascending id order, so a repeated term
                // within one document always lands on the tail entry.
                if postings.last() != Some(&doc.id) {
                    postings.push(doc.id);
                }
            }
            titles
                .entry((doc.title_normalized.clone(), doc.year.clone()))
                .or_default()
                .push(doc.id);

            total_length += u64::from(doc.doc_length);
            max_rating = max_rating.max(doc.average_rating);
            max_votes = max_votes.max(doc.num_votes);
        }

        let document_count = documents.len() as u32;
        let average_doc_length = if document_count == 0 {
            0.0
        } else {
            total_length as f32 / document_count as f32
        };

        // Popularity signals are normalized against the corpus-wide maxima,
        // fixed from here on.
        for doc in &mut documents {
            doc.normalized_rating = if max_rating > 0.0 {
                doc.average_rating / max_rating
            } else {
                0.0
            };
            doc.normalized_votes = if max_votes > 0 {
                doc.num_votes as f32 / max_votes as f32
            } else {
                0.0
            };
        }

        Corpus {
            documents,
            index,
            titles,
            stats: CorpusStats {
                document_count,
                average_doc_length,
                max_rating,
                max_votes,
            },
        }
    }

    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.documents.get(id as usize)
    }

    /// All documents whose normalized title and year match exactly.
    pub fn matches(&self, title_normalized: &str, year: &str) -> &[DocId] {
        self.titles
            .get(&(title_normalized.to_string(), year.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Shared, swappable reference to the current corpus snapshot.
///
/// Readers clone the inner `Arc` and keep scoring against their snapshot
/// even while a rebuilt corpus is swapped in; the write lock is held only
/// for the pointer replacement.
pub struct CorpusHandle {
    inner: RwLock<Arc<Corpus>>,
}

impl CorpusHandle {
    pub fn new(corpus: Corpus) -> Self {
        CorpusHandle {
            inner: RwLock::new(Arc::new(corpus)),
        }
    }

    pub fn load(&self) -> Arc<Corpus> {
        self.inner.read().clone()
    }

    /// Atomically replace the snapshot used by subsequent loads.
    pub fn swap(&self, corpus: Corpus) {
        *self.inner.write() = Arc::new(corpus);
    }
}
