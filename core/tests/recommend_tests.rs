use core::score::{rank, DEFAULT_TOP_K};
use core::{Bm25Params, Corpus, RankWeights, RawRecord};
use std::collections::HashSet;

fn record(
    id: &str,
    title: &str,
    year: &str,
    genres: &str,
    cast: &str,
    rating: f32,
    votes: u64,
) -> RawRecord {
    RawRecord {
        id: id.into(),
        primary_title: title.into(),
        original_title: "\\N".into(),
        year: year.into(),
        genres: genres.into(),
        cast_names: cast.into(),
        average_rating: rating,
        num_votes: votes,
    }
}

fn catalog() -> Vec<RawRecord> {
    vec![
        record("tt1", "Saving Private Ryan", "1998", "Drama, War", "Tom Hanks, Matt Damon", 8.6, 1_400_000),
        record("tt2", "Cast Away", "2000", "Adventure, Drama", "Tom Hanks, Helen Hunt", 7.8, 600_000),
        record("tt3", "The Terminal", "2004", "Comedy, Drama", "Tom Hanks, Catherine Zeta-Jones", 7.4, 480_000),
        record("tt4", "Good Will Hunting", "1997", "Drama, Romance", "Matt Damon, Robin Williams", 8.3, 1_000_000),
        record("tt5", "The Martian", "2015", "Adventure, Drama, Sci-Fi", "Matt Damon, Jessica Chastain", 8.0, 900_000),
        record("tt6", "Paddington", "2014", "Comedy, Family", "Hugh Bonneville, Sally Hawkins", 7.3, 120_000),
    ]
}

#[test]
fn recommends_overlapping_movies_without_the_favorites() {
    let corpus = Corpus::build(catalog());
    let favorites = vec![
        ("Saving Private Ryan".to_string(), "1998".to_string()),
        ("Cast Away".to_string(), "2000".to_string()),
        ("The Terminal".to_string(), "2004".to_string()),
    ];
    let recs = core::query::recommend(
        &corpus,
        &favorites,
        Bm25Params::default(),
        RankWeights::default(),
        DEFAULT_TOP_K,
    );

    assert_eq!(recs.unmatched_favorites, 0);
    let ids: Vec<u32> = recs.results.iter().map(|r| r.doc_id).collect();
    for fav_id in [0u32, 1, 2] {
        assert!(!ids.contains(&fav_id));
    }
    // Every remaining drama/tomhanks-adjacent movie shares at least one
    // term; Paddington shares "comedy" with The Terminal.
    assert!(ids.contains(&3));
    assert!(ids.contains(&4));
    assert!(ids.contains(&5));
    assert!(recs.results.len() <= DEFAULT_TOP_K);

    // Ordered best-first.
    for pair in recs.results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn ranking_is_reproducible_across_rebuilds() {
    let favorites = vec![
        ("Saving Private Ryan".to_string(), "1998".to_string()),
        ("Good Will Hunting".to_string(), "1997".to_string()),
        ("The Martian".to_string(), "2015".to_string()),
    ];
    let run = |records: Vec<RawRecord>| {
        let corpus = Corpus::build(records);
        core::query::recommend(
            &corpus,
            &favorites,
            Bm25Params::default(),
            RankWeights::default(),
            DEFAULT_TOP_K,
        )
        .results
        .iter()
        .map(|r| (r.doc_id, r.score))
        .collect::<Vec<_>>()
    };
    assert_eq!(run(catalog()), run(catalog()));
}

#[test]
fn zero_weight_popularity_reduces_to_pure_bm25_ordering() {
    let corpus = Corpus::build(catalog());
    let weights = RankWeights {
        alpha: 1.0,
        beta: 0.0,
        gamma: 0.0,
    };
    let terms: Vec<String> = vec!["drama".into(), "mattdamon".into()];
    let hits = rank(
        &corpus,
        &terms,
        &HashSet::new(),
        Bm25Params::default(),
        weights,
        DEFAULT_TOP_K,
    );
    // Documents matching both terms must outscore documents matching only
    // the common "drama" term.
    let both: Vec<u32> = vec![0, 3, 4];
    let top: Vec<u32> = hits.iter().take(3).map(|h| h.0).collect();
    for id in top {
        assert!(both.contains(&id));
    }
}

#[test]
fn empty_favorite_list_yields_empty_results() {
    let corpus = Corpus::build(catalog());
    let recs = core::query::recommend(
        &corpus,
        &[],
        Bm25Params::default(),
        RankWeights::default(),
        DEFAULT_TOP_K,
    );
    assert!(recs.results.is_empty());
    assert_eq!(recs.unmatched_favorites, 0);
    assert_eq!(recs.query_terms, 0);
}
