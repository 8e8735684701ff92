use anyhow::{Context, Result};
use axum::{extract::{Query, State}, http::HeaderValue, routing::get, Json, Router};
use ngram_core::{search, IndexStats, InvertedIndex, NgramCounts, StemmingTokenizer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    /// `null` when the query held no phrase at all.
    pub results: Option<NgramCounts>,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<InvertedIndex>,
}

/// Load the persisted index and build the router around it.
///
/// `cors_origins` is a comma-separated origin list; `None` allows any origin.
pub fn build_app<P: AsRef<Path>>(index_path: P, cors_origins: Option<&str>) -> Result<Router> {
    let path = index_path.as_ref();
    let index = InvertedIndex::open(path).with_context(|| format!("loading index {}", path.display()))?;
    Ok(router(Arc::new(index), cors_origins))
}

/// Router over an already built index.
pub fn router(index: Arc<InvertedIndex>, cors_origins: Option<&str>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/stats", get(stats_handler))
        .with_state(AppState { index })
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Read-only GET API, so any method and header is fine; only origins narrow.
fn cors_layer(origins: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let origins: Vec<HeaderValue> = origins
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let results = search(&state.index, &StemmingTokenizer, &params.q);
    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, phrases = results.as_ref().map_or(0, |r| r.len()), "search");
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), results })
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<IndexStats> {
    Json(state.index.stats())
}
