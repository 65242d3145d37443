pub mod corpus;
pub mod document;
pub mod persist;
pub mod query;
pub mod score;
pub mod tokenizer;

pub use corpus::{Corpus, CorpusHandle, CorpusStats, DocId, InvertedIndex, TitleIndex};
pub use document::{Document, RawRecord};
pub use query::{FavoriteQuery, Recommendation, Recommendations};
pub use score::{Bm25Params, RankWeights, DEFAULT_TOP_K};
