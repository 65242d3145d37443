/// Split normalized text into exact-match tokens.
///
/// Documents are lowercased during normalization, so tokenization is plain
/// whitespace splitting: no stemming, no stopword removal, no further case
/// folding. Query text and document text must tokenize identically for
/// membership lookups to hit the index.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
