use core::query::recommend;
use core::{Bm25Params, Corpus, RankWeights, RawRecord, DEFAULT_TOP_K};
use criterion::{criterion_group, criterion_main, Criterion};

const GENRES: [&str; 6] = ["Action", "Comedy", "Drama", "Horror", "Sci-Fi", "Thriller"];
const CAST: [&str; 8] = [
    "Tom Hanks",
    "Matt Damon",
    "Meryl Streep",
    "Denzel Washington",
    "Cate Blanchett",
    "Gary Oldman",
    "Frances McDormand",
    "Sam Lee",
];

fn synthetic_records(n: usize) -> Vec<RawRecord> {
    (0..n)
        .map(|i| RawRecord {
            id: format!("tt{i:07}"),
            primary_title: format!("Film Number {i}"),
            original_title: "\\N".into(),
            year: format!("{}", 1950 + (i % 75)),
            genres: format!("{}, {}", GENRES[i % 6], GENRES[(i / 6) % 6]),
            cast_names: format!("{}, {}", CAST[i % 8], CAST[(i / 8) % 8]),
            average_rating: 1.0 + (i % 90) as f32 / 10.0,
            num_votes: 100 + (i as u64 * 37) % 1_000_000,
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let records = synthetic_records(10_000);
    c.bench_function("corpus_build_10k", |b| {
        b.iter(|| Corpus::build(records.clone()))
    });
}

fn bench_recommend(c: &mut Criterion) {
    let corpus = Corpus::build(synthetic_records(10_000));
    let favorites = vec![
        ("Film Number 17".to_string(), "1967".to_string()),
        ("Film Number 100".to_string(), "1975".to_string()),
        ("Film Number 4242".to_string(), "1992".to_string()),
    ];
    c.bench_function("recommend_10k", |b| {
        b.iter(|| {
            recommend(
                &corpus,
                &favorites,
                Bm25Params::default(),
                RankWeights::default(),
                DEFAULT_TOP_K,
            )
        })
    });
}

criterion_group!(benches, bench_build, bench_recommend);
criterion_main!(benches);
