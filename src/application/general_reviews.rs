use std::sync::Arc;

use tracing::info;

use crate::application::error::ServiceError;
use crate::application::ratings::{group_restaurant_ratings, summary_of};
use crate::application::repos::{
    CreateGeneralReviewParams, CreateReportParams, GeneralReviewsRepo, LikeToggle,
    RestaurantsRepo,
};
use crate::cache::CacheInvalidator;
use crate::domain::entities::{
    GeneralReviewRecord, GeneralReviewReportRecord, GeneralReviewView, UserGeneralReview,
};
use crate::domain::stats::RatingSummary;
use crate::domain::validation::{optional_text, parse_user_id, require_rating, require_user_id};

/// Unvalidated input for a new restaurant-level review.
#[derive(Debug, Clone, Default)]
pub struct NewGeneralReview {
    pub user_id: Option<String>,
    pub restaurant_id: Option<i64>,
    pub rating: Option<i32>,
    pub text: Option<String>,
    pub anonymous: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct NewReport {
    pub general_review_id: Option<i64>,
    pub reason: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Clone)]
pub struct GeneralReviewService {
    restaurants: Arc<dyn RestaurantsRepo>,
    reviews: Arc<dyn GeneralReviewsRepo>,
    cache_invalidator: Option<Arc<CacheInvalidator>>,
}

impl GeneralReviewService {
    pub fn new(restaurants: Arc<dyn RestaurantsRepo>, reviews: Arc<dyn GeneralReviewsRepo>) -> Self {
        Self {
            restaurants,
            reviews,
            cache_invalidator: None,
        }
    }

    pub fn with_cache_invalidator(mut self, invalidator: Arc<CacheInvalidator>) -> Self {
        self.cache_invalidator = Some(invalidator);
        self
    }

    pub fn with_cache_invalidator_opt(mut self, invalidator: Option<Arc<CacheInvalidator>>) -> Self {
        self.cache_invalidator = invalidator;
        self
    }

    pub async fn list(&self) -> Result<Vec<GeneralReviewView>, ServiceError> {
        Ok(self.reviews.list_reviews().await?)
    }

    pub async fn list_by_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<GeneralReviewView>, ServiceError> {
        Ok(self.reviews.list_reviews_by_restaurant(restaurant_id).await?)
    }

    pub async fn list_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<UserGeneralReview>, ServiceError> {
        let user_id = parse_user_id(user_id)?;
        Ok(self.reviews.list_reviews_by_user(user_id).await?)
    }

    pub async fn find(&self, id: i64) -> Result<GeneralReviewView, ServiceError> {
        self.reviews
            .find_review(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("general review"))
    }

    pub async fn stats_for_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<RatingSummary, ServiceError> {
        let ratings = group_restaurant_ratings(
            self.reviews
                .ratings_for_restaurants(&[restaurant_id])
                .await?,
        );
        Ok(summary_of(&ratings, restaurant_id))
    }

    pub async fn create(
        &self,
        input: NewGeneralReview,
    ) -> Result<GeneralReviewRecord, ServiceError> {
        let user_id = require_user_id(input.user_id.as_deref())?;
        let restaurant_id = input
            .restaurant_id
            .ok_or_else(|| ServiceError::validation("Restaurant ID is required"))?;
        let rating = require_rating(input.rating)?;

        if self.restaurants.find_restaurant(restaurant_id).await?.is_none() {
            return Err(ServiceError::not_found("restaurant"));
        }

        let review = self
            .reviews
            .create_review(CreateGeneralReviewParams {
                user_id,
                restaurant_id,
                rating,
                text: optional_text(input.text),
                anonymous: input.anonymous.unwrap_or(false),
            })
            .await?;

        info!(review_id = review.id, restaurant_id, "General review created");
        if let Some(invalidator) = &self.cache_invalidator {
            invalidator.general_review_created(review.id, restaurant_id);
        }
        Ok(review)
    }

    pub async fn delete(&self, id: i64, user_id: Option<&str>) -> Result<(), ServiceError> {
        let user_id = require_user_id(user_id)?;
        let review = self.find(id).await?;
        if review.review.user_id != user_id {
            return Err(ServiceError::forbidden(
                "You can only delete your own reviews",
            ));
        }
        let restaurant_id = review.review.restaurant_id;

        self.reviews.delete_review(id).await?;

        info!(review_id = id, restaurant_id, "General review deleted");
        if let Some(invalidator) = &self.cache_invalidator {
            invalidator.general_review_deleted(id, restaurant_id);
        }
        Ok(())
    }

    pub async fn count_likes(&self, review_id: i64) -> Result<i64, ServiceError> {
        Ok(self.reviews.count_likes(review_id).await?)
    }

    pub async fn has_liked(&self, review_id: i64, user_id: &str) -> Result<bool, ServiceError> {
        let user_id = parse_user_id(user_id)?;
        Ok(self.reviews.has_liked(review_id, user_id).await?)
    }

    pub async fn toggle_like(
        &self,
        review_id: i64,
        user_id: Option<&str>,
    ) -> Result<LikeToggle, ServiceError> {
        let user_id = require_user_id(user_id)?;
        let review = self.find(review_id).await?;

        let toggle = self.reviews.toggle_like(review_id, user_id).await?;

        if let Some(invalidator) = &self.cache_invalidator {
            invalidator.general_review_like_toggled(review_id, review.review.restaurant_id);
        }
        Ok(toggle)
    }

    /// File a moderation report. Reports are not part of any cached view.
    pub async fn report(
        &self,
        input: NewReport,
    ) -> Result<GeneralReviewReportRecord, ServiceError> {
        let general_review_id = input
            .general_review_id
            .ok_or_else(|| ServiceError::validation("General review ID is required"))?;
        let user_id = require_user_id(input.user_id.as_deref())?;
        self.find(general_review_id).await?;

        let report = self
            .reviews
            .create_report(CreateReportParams {
                general_review_id,
                reason: optional_text(input.reason),
                user_id,
            })
            .await?;
        info!(report_id = report.id, general_review_id, "General review reported");
        Ok(report)
    }
}
