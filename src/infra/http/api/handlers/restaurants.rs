//! Restaurant handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use polybites_api_types::{PageQuery, SearchQuery};

use crate::application::pagination::PageParams;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn list_restaurants(
    State(state): State<ApiState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageParams::parse(query.page.as_deref(), query.limit.as_deref());
    let listing = state.restaurants.list(page).await?;
    Ok(Json(listing))
}

pub async fn search_restaurants(
    State(state): State<ApiState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageParams::parse(query.page.as_deref(), query.limit.as_deref());
    let results = state.restaurants.search(query.q.as_deref(), page).await?;
    Ok(Json(results))
}

pub async fn get_restaurant(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let restaurant = state.restaurants.find(id).await?;
    Ok(Json(restaurant))
}

pub async fn get_restaurant_stats(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.restaurants.stats(id).await?;
    Ok(Json(stats))
}

pub async fn list_restaurant_reviews(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state.restaurants.list_legacy_reviews().await?;
    Ok(Json(reviews))
}
