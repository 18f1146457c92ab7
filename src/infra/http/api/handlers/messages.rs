//! Contact message handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use polybites_api_types::{CreateMessageRequest, MessageCreatedResponse};

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::extract::LenientJson;
use crate::infra::http::api::state::ApiState;

pub async fn create_message(
    State(state): State<ApiState>,
    LenientJson(payload): LenientJson<CreateMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let data = state
        .messages
        .create(
            payload.profile_id,
            payload.subject.as_deref(),
            payload.message.as_deref(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageCreatedResponse {
            success: true,
            message: "Message submitted successfully".to_string(),
            data,
        }),
    ))
}

pub async fn list_messages(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let messages = state.messages.list().await?;
    Ok(Json(messages))
}

pub async fn get_message(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state.messages.find(id).await?;
    Ok(Json(message))
}
