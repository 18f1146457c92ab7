//! Response cache admin handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use polybites_api_types::CacheStatsResponse;
use tracing::info;

use crate::infra::http::api::state::ApiState;

pub async fn cache_stats(State(state): State<ApiState>) -> impl IntoResponse {
    let stats = state.cache.cache.stats();
    Json(CacheStatsResponse {
        hits: stats.hits,
        misses: stats.misses,
        keys: stats.keys,
        hit_rate: stats.hit_rate,
    })
}

pub async fn flush_cache(State(state): State<ApiState>) -> impl IntoResponse {
    let removed = state.cache.cache.flush_all();
    info!(target = "polybites::cache", removed, "Response cache flushed");
    StatusCode::NO_CONTENT
}
