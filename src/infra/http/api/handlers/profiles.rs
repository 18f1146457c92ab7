//! Profile handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use polybites_api_types::{
    ActorRequest, CheckUserQuery, CheckUserResponse, CreateProfileRequest, MessageResponse,
    UpdateProfileRequest,
};

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::extract::LenientJson;
use crate::infra::http::api::state::ApiState;

pub async fn list_profiles(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let profiles = state.profiles.list().await?;
    Ok(Json(profiles))
}

pub async fn get_profile(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.profiles.find(id).await?;
    Ok(Json(profile))
}

pub async fn get_profile_by_auth(
    State(state): State<ApiState>,
    Path(auth_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.profiles.find_by_auth(&auth_id).await?;
    Ok(Json(profile))
}

pub async fn check_user(
    State(state): State<ApiState>,
    Query(query): Query<CheckUserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let exists = state.profiles.check_user(query.email.as_deref()).await?;
    let message = if exists {
        "User already exists with this email"
    } else {
        "Email is available"
    };
    Ok(Json(CheckUserResponse {
        exists,
        message: message.to_string(),
    }))
}

pub async fn create_profile(
    State(state): State<ApiState>,
    LenientJson(payload): LenientJson<CreateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .profiles
        .create(payload.name.as_deref(), payload.auth_id.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn update_profile(
    State(state): State<ApiState>,
    Path(auth_id): Path<String>,
    LenientJson(payload): LenientJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .profiles
        .rename(&auth_id, payload.name.as_deref())
        .await?;
    Ok(Json(profile))
}

pub async fn delete_profile(
    State(state): State<ApiState>,
    Path(auth_id): Path<String>,
    LenientJson(payload): LenientJson<ActorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .profiles
        .delete(&auth_id, payload.user_id.as_deref())
        .await?;
    Ok(Json(MessageResponse::new(
        "Profile and auth user deleted successfully",
    )))
}
