//! Domain entities mirrored from persistent storage, plus the read views built on them.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::stats::{FoodStats, RestaurantStats};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Restaurant with its menu size. Carries no rating data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantSummary {
    #[serde(flatten)]
    pub restaurant: RestaurantRecord,
    pub menu_item_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantSearchHit {
    #[serde(flatten)]
    pub restaurant: RestaurantRecord,
    pub menu_item_count: i64,
    #[serde(flatten)]
    pub stats: RestaurantStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodRecord {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub food_type: Option<String>,
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl FoodRecord {
    /// Case-insensitive substring match on name or description.
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        self.name.to_lowercase().contains(needle_lowercase)
            || self
                .description
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(needle_lowercase))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodWithStats {
    #[serde(flatten)]
    pub food: FoodRecord,
    #[serde(flatten)]
    pub stats: FoodStats,
}

/// One raw rating row of a food review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodRating {
    pub food_id: i64,
    pub rating: i32,
}

/// One raw rating row of a general (restaurant-level) review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestaurantRating {
    pub restaurant_id: i64,
    pub rating: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodReviewRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub food_id: i64,
    pub rating: i32,
    pub text: Option<String>,
    pub anonymous: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodReviewView {
    #[serde(flatten)]
    pub review: FoodReviewRecord,
    pub like_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantFoodReview {
    #[serde(flatten)]
    pub review: FoodReviewView,
    pub food_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserFoodReview {
    #[serde(flatten)]
    pub review: FoodReviewView,
    pub food_name: String,
    pub food_type: Option<String>,
    pub restaurant_id: i64,
    pub restaurant_name: String,
}

/// Per-restaurant food review totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodReviewDetail {
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub review_count: i64,
    pub average_rating: f64,
}

/// Identifiers a food review mutation fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodReviewScope {
    pub review_id: i64,
    pub food_id: i64,
    pub restaurant_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralReviewRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub restaurant_id: i64,
    pub rating: i32,
    pub text: Option<String>,
    pub anonymous: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralReviewView {
    #[serde(flatten)]
    pub review: GeneralReviewRecord,
    pub like_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserGeneralReview {
    #[serde(flatten)]
    pub review: GeneralReviewView,
    pub restaurant_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralReviewReportRecord {
    pub id: i64,
    pub general_review_id: i64,
    pub reason: Option<String>,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Row of the legacy `restaurant_reviews` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantReviewRecord {
    pub id: i64,
    pub restaurant_id: i64,
    pub user_id: Option<Uuid>,
    pub rating: i32,
    pub comment: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Publicly visible profile fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRecord {
    pub id: i64,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Full profile row, returned to the owner after an update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileAccount {
    pub id: i64,
    pub auth_id: Uuid,
    pub name: String,
    /// Remaining renames; `0` once the single allowed rename is used.
    pub name_change: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ProfileAccount {
    pub fn can_rename(&self) -> bool {
        self.name_change > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRecord {
    pub id: i64,
    pub profile_id: Option<i64>,
    pub subject: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    #[serde(flatten)]
    pub message: MessageRecord,
    pub user_name: Option<String>,
}
