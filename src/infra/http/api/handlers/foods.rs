//! Food handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use polybites_api_types::SearchQuery;
use serde::Serialize;

use crate::domain::entities::FoodWithStats;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

#[derive(Serialize)]
struct FoodList {
    data: Vec<FoodWithStats>,
}

pub async fn list_foods(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let data = state.foods.list().await?;
    Ok(Json(FoodList { data }))
}

pub async fn list_foods_by_restaurant(
    State(state): State<ApiState>,
    Path(restaurant_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let foods = state.foods.list_by_restaurant(restaurant_id).await?;
    Ok(Json(foods))
}

pub async fn search_foods_by_restaurant(
    State(state): State<ApiState>,
    Path(restaurant_id): Path<i64>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let foods = state
        .foods
        .search_by_restaurant(restaurant_id, query.q.as_deref())
        .await?;
    Ok(Json(foods))
}

pub async fn get_food(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let food = state.foods.find(id).await?;
    Ok(Json(food))
}
