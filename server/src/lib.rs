use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use core_lib::persist::{load_corpus, IndexPaths};
use core_lib::query::recommend;
use core_lib::{Bm25Params, CorpusHandle, DocId, Document, RankWeights, Recommendation, DEFAULT_TOP_K};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, AllowOrigin, CorsLayer};

/// Fewer favorites than this give too thin a pseudo-query to rank against.
pub const MIN_FAVORITES: usize = 3;
pub const AUTOCOMPLETE_LIMIT: usize = 10;
const MAX_TOP_K: usize = 100;

#[derive(Debug, Clone, Copy)]
pub struct ScoringConfig {
    pub bm25: Bm25Params,
    pub weights: RankWeights,
    pub top_k: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            bm25: Bm25Params::default(),
            weights: RankWeights::default(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub index_root: PathBuf,
    pub corpus: Arc<CorpusHandle>,
    pub scoring: ScoringConfig,
    pub admin_token: Option<String>,
}

#[derive(Deserialize)]
pub struct FavoritePick {
    pub title: String,
    pub year: String,
}

#[derive(Deserialize)]
pub struct RecommendRequest {
    pub favorites: Vec<FavoritePick>,
    /// Result count override, clamped to [1, 100].
    #[serde(default)]
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub took_s: f64,
    pub query_terms: usize,
    pub unmatched_favorites: usize,
    pub results: Vec<Recommendation>,
}

#[derive(Deserialize)]
pub struct AutocompleteParams {
    pub term: String,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Serialize)]
pub struct Suggestion {
    pub label: String,
    pub value: String,
    pub year: String,
}

pub fn build_app(index_dir: String, scoring: ScoringConfig) -> Result<Router> {
    // Load the corpus snapshot once at startup; queries share it read-only.
    let corpus = load_corpus(&IndexPaths::new(&index_dir))?;
    tracing::info!(documents = corpus.stats.document_count, "corpus loaded");

    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let app_state = AppState {
        index_root: PathBuf::from(&index_dir),
        corpus: Arc::new(CorpusHandle::new(corpus)),
        scoring,
        admin_token,
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recommend", post(recommend_handler))
        .route("/autocomplete", get(autocomplete_handler))
        .route("/movie/:doc_id", get(movie_handler))
        .route("/index/reload", post(reload_handler))
        .with_state(app_state)
        .layer(cors);
    Ok(app)
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, (StatusCode, String)> {
    if req.favorites.len() < MIN_FAVORITES {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("at least {MIN_FAVORITES} favorites are required"),
        ));
    }
    let start = std::time::Instant::now();
    let corpus = state.corpus.load();
    let favorites: Vec<(String, String)> = req
        .favorites
        .into_iter()
        .map(|f| (f.title, f.year))
        .collect();
    let top_k = req.k.unwrap_or(state.scoring.top_k).clamp(1, MAX_TOP_K);

    let recs = recommend(
        &corpus,
        &favorites,
        state.scoring.bm25,
        state.scoring.weights,
        top_k,
    );
    Ok(Json(RecommendResponse {
        took_s: start.elapsed().as_secs_f64(),
        query_terms: recs.query_terms,
        unmatched_favorites: recs.unmatched_favorites,
        results: recs.results,
    }))
}

/// Substring filter over the document store, independent of the inverted
/// index. Titles starting with the needle rank above other substring
/// matches; each tier keeps doc-id order.
pub async fn autocomplete_handler(
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> Json<Vec<Suggestion>> {
    let needle = params.term.trim().to_lowercase();
    if needle.is_empty() {
        return Json(Vec::new());
    }
    let year = params
        .year
        .as_deref()
        .map(str::trim)
        .filter(|y| !y.is_empty());
    let corpus = state.corpus.load();

    let mut prefix: Vec<&Document> = Vec::new();
    let mut inner: Vec<&Document> = Vec::new();
    for doc in &corpus.documents {
        if prefix.len() >= AUTOCOMPLETE_LIMIT {
            break;
        }
        if year.is_some_and(|y| doc.year != y) {
            continue;
        }
        if doc.title_normalized.starts_with(&needle) {
            prefix.push(doc);
        } else if doc.title_normalized.contains(&needle) {
            inner.push(doc);
        }
    }

    let suggestions = prefix
        .into_iter()
        .chain(inner)
        .take(AUTOCOMPLETE_LIMIT)
        .map(|doc| Suggestion {
            label: format!("{} ({})", doc.title_raw, doc.year),
            value: doc.title_raw.clone(),
            year: doc.year.clone(),
        })
        .collect();
    Json(suggestions)
}

pub async fn movie_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocId>,
) -> Json<serde_json::Value> {
    let corpus = state.corpus.load();
    if let Some(doc) = corpus.document(doc_id) {
        return Json(serde_json::json!({
            "doc_id": doc.id,
            "external_id": doc.external_id,
            "title": doc.title_raw,
            "original_title": doc.original_title,
            "year": doc.year,
            "genres": doc.genre_tokens,
            "average_rating": doc.average_rating,
            "num_votes": doc.num_votes,
        }));
    }
    Json(serde_json::json!({ "error": "not found" }))
}

/// Rebuild path: re-read the persisted snapshot and swap it in atomically.
/// In-flight queries keep the snapshot they loaded.
pub async fn reload_handler(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let corpus = load_corpus(&IndexPaths::new(&state.index_root))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("reload failed: {e}")))?;
    let document_count = corpus.stats.document_count;
    state.corpus.swap(corpus);
    tracing::info!(document_count, "corpus reloaded");
    Ok(Json(serde_json::json!({ "document_count": document_count })))
}

fn authorize(state: &AppState, headers: &axum::http::HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers
        .get("X-ADMIN-TOKEN")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
