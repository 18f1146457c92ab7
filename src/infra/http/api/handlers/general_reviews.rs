//! General (restaurant-level) review handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use polybites_api_types::{
    ActorRequest, CreateGeneralReviewRequest, LikeCountResponse, LikeExistsResponse,
    MessageResponse, ReportCreatedResponse, ReportGeneralReviewRequest, ToggleLikeRequest,
    ToggleLikeResponse,
};

use crate::application::general_reviews::{NewGeneralReview, NewReport};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::extract::LenientJson;
use crate::infra::http::api::state::ApiState;

pub async fn list_general_reviews(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state.general_reviews.list().await?;
    Ok(Json(reviews))
}

pub async fn list_general_reviews_by_restaurant(
    State(state): State<ApiState>,
    Path(restaurant_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state
        .general_reviews
        .list_by_restaurant(restaurant_id)
        .await?;
    Ok(Json(reviews))
}

pub async fn general_review_stats(
    State(state): State<ApiState>,
    Path(restaurant_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .general_reviews
        .stats_for_restaurant(restaurant_id)
        .await?;
    Ok(Json(summary))
}

pub async fn list_general_reviews_by_user(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state.general_reviews.list_by_user(&user_id).await?;
    Ok(Json(reviews))
}

pub async fn get_general_review(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state.general_reviews.find(id).await?;
    Ok(Json(review))
}

pub async fn create_general_review(
    State(state): State<ApiState>,
    LenientJson(payload): LenientJson<CreateGeneralReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .general_reviews
        .create(NewGeneralReview {
            user_id: payload.user_id,
            restaurant_id: payload.restaurant_id,
            rating: payload.rating,
            text: payload.text,
            anonymous: payload.anonymous,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn delete_general_review(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    LenientJson(payload): LenientJson<ActorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .general_reviews
        .delete(id, payload.user_id.as_deref())
        .await?;
    Ok(Json(MessageResponse::new("Review deleted successfully")))
}

pub async fn general_review_likes(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let likes = state.general_reviews.count_likes(id).await?;
    Ok(Json(LikeCountResponse { likes }))
}

pub async fn general_review_liked_by(
    State(state): State<ApiState>,
    Path((id, user_id)): Path<(i64, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let exists = state.general_reviews.has_liked(id, &user_id).await?;
    Ok(Json(LikeExistsResponse { exists }))
}

pub async fn toggle_general_review_like(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    LenientJson(payload): LenientJson<ToggleLikeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let toggle = state
        .general_reviews
        .toggle_like(id, payload.user_id.as_deref())
        .await?;
    Ok(Json(ToggleLikeResponse {
        likes: toggle.likes,
        liked: toggle.liked,
    }))
}

pub async fn report_general_review(
    State(state): State<ApiState>,
    LenientJson(payload): LenientJson<ReportGeneralReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .general_reviews
        .report(NewReport {
            general_review_id: payload.general_review_id,
            reason: payload.reason,
            user_id: payload.user_id,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ReportCreatedResponse {
            message: "Report submitted successfully".to_string(),
            report,
        }),
    ))
}
