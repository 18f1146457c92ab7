//! Food review handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use polybites_api_types::{
    ActorRequest, CreateFoodReviewRequest, LikeCountResponse, LikeExistsResponse,
    MessageResponse, ToggleLikeRequest, ToggleLikeResponse,
};

use crate::application::food_reviews::NewFoodReview;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::extract::LenientJson;
use crate::infra::http::api::state::ApiState;

pub async fn list_food_reviews(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state.food_reviews.list().await?;
    Ok(Json(reviews))
}

pub async fn food_review_details(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let details = state.food_reviews.details().await?;
    Ok(Json(details))
}

pub async fn list_food_reviews_by_food(
    State(state): State<ApiState>,
    Path(food_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state.food_reviews.list_by_food(food_id).await?;
    Ok(Json(reviews))
}

pub async fn food_review_stats(
    State(state): State<ApiState>,
    Path(food_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.food_reviews.stats_for_food(food_id).await?;
    Ok(Json(summary))
}

pub async fn list_food_reviews_by_restaurant(
    State(state): State<ApiState>,
    Path(restaurant_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state.food_reviews.list_by_restaurant(restaurant_id).await?;
    Ok(Json(reviews))
}

pub async fn food_review_stats_by_restaurant(
    State(state): State<ApiState>,
    Path(restaurant_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.food_reviews.stats_by_restaurant(restaurant_id).await?;
    Ok(Json(stats))
}

pub async fn list_food_reviews_by_user(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state.food_reviews.list_by_user(&user_id).await?;
    Ok(Json(reviews))
}

pub async fn get_food_review(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state.food_reviews.find(id).await?;
    Ok(Json(review))
}

pub async fn create_food_review(
    State(state): State<ApiState>,
    LenientJson(payload): LenientJson<CreateFoodReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .food_reviews
        .create(NewFoodReview {
            user_id: payload.user_id,
            food_id: payload.food_id,
            rating: payload.rating,
            text: payload.text,
            anonymous: payload.anonymous,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn delete_food_review(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    LenientJson(payload): LenientJson<ActorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .food_reviews
        .delete(id, payload.user_id.as_deref())
        .await?;
    Ok(Json(MessageResponse::new("Review deleted successfully")))
}

pub async fn food_review_likes(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let likes = state.food_reviews.count_likes(id).await?;
    Ok(Json(LikeCountResponse { likes }))
}

pub async fn food_review_liked_by(
    State(state): State<ApiState>,
    Path((id, user_id)): Path<(i64, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let exists = state.food_reviews.has_liked(id, &user_id).await?;
    Ok(Json(LikeExistsResponse { exists }))
}

pub async fn toggle_food_review_like(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    LenientJson(payload): LenientJson<ToggleLikeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let toggle = state
        .food_reviews
        .toggle_like(id, payload.user_id.as_deref())
        .await?;
    Ok(Json(ToggleLikeResponse {
        likes: toggle.likes,
        liked: toggle.liked,
    }))
}
