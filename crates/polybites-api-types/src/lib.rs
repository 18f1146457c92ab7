//! Request and response payloads shared by the PolyBites API and its clients.
//!
//! Request bodies keep every field optional so that missing values surface as
//! validation errors from the service layer instead of deserialisation failures.

use serde::{Deserialize, Serialize};

/// Generic error envelope: `{ "error": { "code", "message", "hint"? } }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

/// `?page&limit`. Values are kept as text and parsed leniently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckUserQuery {
    #[serde(default)]
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateFoodReviewRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub food_id: Option<i64>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub anonymous: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateGeneralReviewRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub restaurant_id: Option<i64>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub anonymous: Option<bool>,
}

/// Body of review and profile deletions: the acting user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActorRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// `POST /{id}/toggle-like`. The review comes from the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToggleLikeRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportGeneralReviewRequest {
    #[serde(default)]
    pub general_review_id: Option<i64>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LikeCountResponse {
    pub likes: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LikeExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToggleLikeResponse {
    pub likes: i64,
    pub liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportCreatedResponse<T> {
    pub message: String,
    pub report: T,
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub auth_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckUserResponse {
    pub exists: bool,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub profile_id: Option<i64>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreatedResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

// ---------------------------------------------------------------------------
// Cache admin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CacheStatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub keys: u64,
    #[serde(rename = "hitRate")]
    pub hit_rate: f64,
}
