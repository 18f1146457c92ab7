use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::application::error::ServiceError;
use crate::application::ratings::{group_food_ratings, summary_of};
use crate::application::repos::{
    CreateFoodReviewParams, FoodReviewsRepo, FoodsRepo, LikeToggle, RepoError, RestaurantsRepo,
};
use crate::cache::CacheInvalidator;
use crate::domain::entities::{
    FoodReviewDetail, FoodReviewRecord, FoodReviewScope, FoodReviewView, RestaurantFoodReview,
    UserFoodReview,
};
use crate::domain::stats::RatingSummary;
use crate::domain::validation::{optional_text, parse_user_id, require_rating, require_user_id};

/// Unvalidated input for a new food review.
#[derive(Debug, Clone, Default)]
pub struct NewFoodReview {
    pub user_id: Option<String>,
    pub food_id: Option<i64>,
    pub rating: Option<i32>,
    pub text: Option<String>,
    pub anonymous: Option<bool>,
}

#[derive(Clone)]
pub struct FoodReviewService {
    restaurants: Arc<dyn RestaurantsRepo>,
    foods: Arc<dyn FoodsRepo>,
    reviews: Arc<dyn FoodReviewsRepo>,
    cache_invalidator: Option<Arc<CacheInvalidator>>,
}

impl FoodReviewService {
    pub fn new(
        restaurants: Arc<dyn RestaurantsRepo>,
        foods: Arc<dyn FoodsRepo>,
        reviews: Arc<dyn FoodReviewsRepo>,
    ) -> Self {
        Self {
            restaurants,
            foods,
            reviews,
            cache_invalidator: None,
        }
    }

    /// Set the cache invalidator for this service.
    pub fn with_cache_invalidator(mut self, invalidator: Arc<CacheInvalidator>) -> Self {
        self.cache_invalidator = Some(invalidator);
        self
    }

    /// Set the cache invalidator for this service (optional).
    pub fn with_cache_invalidator_opt(mut self, invalidator: Option<Arc<CacheInvalidator>>) -> Self {
        self.cache_invalidator = invalidator;
        self
    }

    pub async fn list(&self) -> Result<Vec<FoodReviewView>, ServiceError> {
        Ok(self.reviews.list_reviews().await?)
    }

    pub async fn list_by_food(&self, food_id: i64) -> Result<Vec<FoodReviewView>, ServiceError> {
        Ok(self.reviews.list_reviews_by_food(food_id).await?)
    }

    pub async fn list_by_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<RestaurantFoodReview>, ServiceError> {
        Ok(self.reviews.list_reviews_by_restaurant(restaurant_id).await?)
    }

    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<UserFoodReview>, ServiceError> {
        let user_id = parse_user_id(user_id)?;
        Ok(self.reviews.list_reviews_by_user(user_id).await?)
    }

    pub async fn find(&self, id: i64) -> Result<FoodReviewView, ServiceError> {
        self.reviews
            .find_review(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("food review"))
    }

    /// Food review totals for every restaurant, most reviewed first.
    pub async fn details(&self) -> Result<Vec<FoodReviewDetail>, ServiceError> {
        let (restaurants, foods) = tokio::try_join!(
            self.restaurants.list_all_restaurants(),
            self.foods.list_foods()
        )?;
        let food_ids: Vec<i64> = foods.iter().map(|food| food.id).collect();
        let ratings = group_food_ratings(self.reviews.ratings_for_foods(&food_ids).await?);

        let mut details: Vec<FoodReviewDetail> = restaurants
            .into_iter()
            .map(|row| {
                let summary = RatingSummary::from_ratings(
                    foods
                        .iter()
                        .filter(|food| food.restaurant_id == row.restaurant.id)
                        .flat_map(|food| ratings.get(&food.id).into_iter().flatten().copied()),
                );
                FoodReviewDetail {
                    restaurant_id: row.restaurant.id,
                    restaurant_name: row.restaurant.name,
                    review_count: summary.review_count,
                    average_rating: summary.average_rating,
                }
            })
            .collect();
        details.sort_by(|a, b| b.review_count.cmp(&a.review_count));
        Ok(details)
    }

    /// Summary for one food; a food without reviews (or unknown) yields zeros.
    pub async fn stats_for_food(&self, food_id: i64) -> Result<RatingSummary, ServiceError> {
        let ratings = group_food_ratings(self.reviews.ratings_for_foods(&[food_id]).await?);
        Ok(summary_of(&ratings, food_id))
    }

    /// Summary per food on the restaurant's menu, including foods without reviews.
    pub async fn stats_by_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<BTreeMap<i64, RatingSummary>, ServiceError> {
        let foods = self
            .foods
            .list_foods_by_restaurants(&[restaurant_id])
            .await?;
        if foods.is_empty() {
            return Ok(BTreeMap::new());
        }
        let food_ids: Vec<i64> = foods.iter().map(|food| food.id).collect();
        let ratings = group_food_ratings(self.reviews.ratings_for_foods(&food_ids).await?);
        Ok(food_ids
            .into_iter()
            .map(|id| (id, summary_of(&ratings, id)))
            .collect())
    }

    pub async fn create(&self, input: NewFoodReview) -> Result<FoodReviewRecord, ServiceError> {
        let user_id = require_user_id(input.user_id.as_deref())?;
        let food_id = input
            .food_id
            .ok_or_else(|| ServiceError::validation("Food ID is required"))?;
        let rating = require_rating(input.rating)?;

        let food = self
            .foods
            .find_food(food_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("food"))?;

        let review = self
            .reviews
            .create_review(CreateFoodReviewParams {
                user_id,
                food_id,
                rating,
                text: optional_text(input.text),
                anonymous: input.anonymous.unwrap_or(false),
            })
            .await?;

        info!(
            review_id = review.id,
            food_id,
            restaurant_id = food.restaurant_id,
            "Food review created"
        );
        if let Some(invalidator) = &self.cache_invalidator {
            invalidator.food_review_created(review.id, food_id, food.restaurant_id);
        }

        Ok(review)
    }

    /// Delete a review owned by `user_id`.
    pub async fn delete(&self, id: i64, user_id: Option<&str>) -> Result<(), ServiceError> {
        let user_id = require_user_id(user_id)?;
        let review = self.find(id).await?;
        if review.review.user_id != user_id {
            return Err(ServiceError::forbidden(
                "You can only delete your own reviews",
            ));
        }
        let scope = self.scope_of(&review.review).await?;

        self.reviews.delete_review(id).await?;

        info!(review_id = id, food_id = scope.food_id, "Food review deleted");
        if let Some(invalidator) = &self.cache_invalidator {
            invalidator.food_review_deleted(scope.review_id, scope.food_id, scope.restaurant_id);
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
        let scope = self.scope_of(&review.review).await?;

        let toggle = self.reviews.toggle_like(review_id, user_id).await?;

        if let Some(invalidator) = &self.cache_invalidator {
            invalidator.food_review_like_toggled(
                scope.review_id,
                scope.food_id,
                scope.restaurant_id,
            );
        }
        Ok(toggle)
    }

    /// Resolve the food and restaurant a review belongs to.
    async fn scope_of(&self, review: &FoodReviewRecord) -> Result<FoodReviewScope, ServiceError> {
        let food = self
            .foods
            .find_food(review.food_id)
            .await?
            .ok_or_else(|| RepoError::Integrity {
                message: format!(
                    "food review {} references missing food {}",
                    review.id, review.food_id
                ),
            })?;
        Ok(FoodReviewScope {
            review_id: review.id,
            food_id: food.id,
            restaurant_id: food.restaurant_id,
        })
    }
}
