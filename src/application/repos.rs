//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::application::pagination::PageParams;
use crate::domain::entities::{
    FoodRating, FoodRecord, FoodReviewRecord, FoodReviewScope, FoodReviewView,
    GeneralReviewRecord, GeneralReviewReportRecord, GeneralReviewView, MessageRecord,
    MessageView, ProfileAccount, ProfileRecord, RestaurantFoodReview, RestaurantRating,
    RestaurantReviewRecord, RestaurantSummary, UserFoodReview, UserGeneralReview,
};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Outcome of flipping a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    pub likes: i64,
    pub liked: bool,
}

#[derive(Debug, Clone)]
pub struct CreateFoodReviewParams {
    pub user_id: Uuid,
    pub food_id: i64,
    pub rating: i32,
    pub text: Option<String>,
    pub anonymous: bool,
}

#[derive(Debug, Clone)]
pub struct CreateGeneralReviewParams {
    pub user_id: Uuid,
    pub restaurant_id: i64,
    pub rating: i32,
    pub text: Option<String>,
    pub anonymous: bool,
}

#[derive(Debug, Clone)]
pub struct CreateReportParams {
    pub general_review_id: i64,
    pub reason: Option<String>,
    pub user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct CreateMessageParams {
    pub profile_id: Option<i64>,
    pub subject: String,
    pub message: String,
}

#[async_trait]
pub trait RestaurantsRepo: Send + Sync {
    async fn count_restaurants(&self) -> Result<i64, RepoError>;

    async fn list_restaurants(&self, page: PageParams)
    -> Result<Vec<RestaurantSummary>, RepoError>;

    async fn list_all_restaurants(&self) -> Result<Vec<RestaurantSummary>, RepoError>;

    /// Case-insensitive match on name or description.
    async fn search_restaurants(&self, needle: &str) -> Result<Vec<RestaurantSummary>, RepoError>;

    async fn find_restaurant(&self, id: i64) -> Result<Option<RestaurantSummary>, RepoError>;

    async fn list_restaurant_reviews(&self) -> Result<Vec<RestaurantReviewRecord>, RepoError>;
}

#[async_trait]
pub trait FoodsRepo: Send + Sync {
    async fn list_foods(&self) -> Result<Vec<FoodRecord>, RepoError>;

    async fn list_foods_by_restaurants(
        &self,
        restaurant_ids: &[i64],
    ) -> Result<Vec<FoodRecord>, RepoError>;

    async fn find_food(&self, id: i64) -> Result<Option<FoodRecord>, RepoError>;
}

#[async_trait]
pub trait FoodReviewsRepo: Send + Sync {
    async fn ratings_for_foods(&self, food_ids: &[i64]) -> Result<Vec<FoodRating>, RepoError>;

    async fn list_reviews(&self) -> Result<Vec<FoodReviewView>, RepoError>;

    async fn list_reviews_by_food(&self, food_id: i64) -> Result<Vec<FoodReviewView>, RepoError>;

    async fn list_reviews_by_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<RestaurantFoodReview>, RepoError>;

    /// Newest first.
    async fn list_reviews_by_user(&self, user_id: Uuid) -> Result<Vec<UserFoodReview>, RepoError>;

    async fn find_review(&self, id: i64) -> Result<Option<FoodReviewView>, RepoError>;

    async fn create_review(
        &self,
        params: CreateFoodReviewParams,
    ) -> Result<FoodReviewRecord, RepoError>;

    /// Removes the review and its likes.
    async fn delete_review(&self, id: i64) -> Result<(), RepoError>;

    /// Removes every review written by the user, returning the scope of each
    /// row the delete actually removed.
    async fn delete_reviews_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FoodReviewScope>, RepoError>;

    async fn count_likes(&self, review_id: i64) -> Result<i64, RepoError>;

    async fn has_liked(&self, review_id: i64, user_id: Uuid) -> Result<bool, RepoError>;

    async fn toggle_like(&self, review_id: i64, user_id: Uuid) -> Result<LikeToggle, RepoError>;
}

#[async_trait]
pub trait GeneralReviewsRepo: Send + Sync {
    async fn ratings_for_restaurants(
        &self,
        restaurant_ids: &[i64],
    ) -> Result<Vec<RestaurantRating>, RepoError>;

    async fn list_reviews(&self) -> Result<Vec<GeneralReviewView>, RepoError>;

    async fn list_reviews_by_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<GeneralReviewView>, RepoError>;

    /// Newest first.
    async fn list_reviews_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserGeneralReview>, RepoError>;

    async fn find_review(&self, id: i64) -> Result<Option<GeneralReviewView>, RepoError>;

    async fn create_review(
        &self,
        params: CreateGeneralReviewParams,
    ) -> Result<GeneralReviewRecord, RepoError>;

    /// Removes the review and its likes.
    async fn delete_review(&self, id: i64) -> Result<(), RepoError>;

    async fn count_likes(&self, review_id: i64) -> Result<i64, RepoError>;

    async fn has_liked(&self, review_id: i64, user_id: Uuid) -> Result<bool, RepoError>;

    async fn toggle_like(&self, review_id: i64, user_id: Uuid) -> Result<LikeToggle, RepoError>;

    async fn create_report(
        &self,
        params: CreateReportParams,
    ) -> Result<GeneralReviewReportRecord, RepoError>;
}

#[async_trait]
pub trait ProfilesRepo: Send + Sync {
    async fn list_profiles(&self) -> Result<Vec<ProfileRecord>, RepoError>;

    async fn find_profile(&self, id: i64) -> Result<Option<ProfileRecord>, RepoError>;

    async fn find_by_auth_id(&self, auth_id: Uuid) -> Result<Option<ProfileAccount>, RepoError>;

    /// Fails with [`RepoError::Duplicate`] when the identity already has a profile.
    async fn create_profile(&self, name: &str, auth_id: Uuid) -> Result<ProfileRecord, RepoError>;

    /// Renames and consumes the single allowed rename.
    async fn rename_profile(
        &self,
        auth_id: Uuid,
        name: &str,
    ) -> Result<Option<ProfileAccount>, RepoError>;

    async fn delete_profile(&self, auth_id: Uuid) -> Result<Option<ProfileAccount>, RepoError>;

    async fn auth_user_exists(&self, auth_id: Uuid) -> Result<bool, RepoError>;

    async fn email_registered(&self, email: &str) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait MessagesRepo: Send + Sync {
    async fn create_message(&self, params: CreateMessageParams)
    -> Result<MessageRecord, RepoError>;

    async fn list_messages(&self) -> Result<Vec<MessageView>, RepoError>;

    async fn find_message(&self, id: i64) -> Result<Option<MessageView>, RepoError>;
}

/// Liveness check against the backing store.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
