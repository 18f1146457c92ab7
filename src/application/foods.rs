use std::sync::Arc;

use crate::application::error::ServiceError;
use crate::application::ratings::{group_food_ratings, with_food_stats};
use crate::application::repos::{FoodReviewsRepo, FoodsRepo};
use crate::domain::entities::{FoodRecord, FoodWithStats};
use crate::domain::stats::FoodStats;

/// Menu items enriched with their rating stats.
#[derive(Clone)]
pub struct FoodService {
    foods: Arc<dyn FoodsRepo>,
    food_reviews: Arc<dyn FoodReviewsRepo>,
}

impl FoodService {
    pub fn new(foods: Arc<dyn FoodsRepo>, food_reviews: Arc<dyn FoodReviewsRepo>) -> Self {
        Self {
            foods,
            food_reviews,
        }
    }

    pub async fn list(&self) -> Result<Vec<FoodWithStats>, ServiceError> {
        let foods = self.foods.list_foods().await?;
        self.enrich(foods).await
    }

    pub async fn list_by_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<FoodWithStats>, ServiceError> {
        let foods = self
            .foods
            .list_foods_by_restaurants(&[restaurant_id])
            .await?;
        self.enrich(foods).await
    }

    /// Case-insensitive filter over one restaurant's menu. A blank query returns the whole menu.
    pub async fn search_by_restaurant(
        &self,
        restaurant_id: i64,
        query: Option<&str>,
    ) -> Result<Vec<FoodWithStats>, ServiceError> {
        let mut foods = self
            .foods
            .list_foods_by_restaurants(&[restaurant_id])
            .await?;

        let needle = query
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .map(str::to_lowercase);
        if let Some(needle) = needle {
            foods.retain(|food| food.matches(&needle));
        }
        self.enrich(foods).await
    }

    pub async fn find(&self, id: i64) -> Result<FoodWithStats, ServiceError> {
        let food = self
            .foods
            .find_food(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("food"))?;
        let ratings: Vec<i32> = self
            .food_reviews
            .ratings_for_foods(&[id])
            .await?
            .into_iter()
            .map(|row| row.rating)
            .collect();
        let stats = FoodStats::compute(&ratings, food.price);
        Ok(FoodWithStats { food, stats })
    }

    async fn enrich(&self, foods: Vec<FoodRecord>) -> Result<Vec<FoodWithStats>, ServiceError> {
        if foods.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = foods.iter().map(|food| food.id).collect();
        let ratings = group_food_ratings(self.food_reviews.ratings_for_foods(&ids).await?);
        Ok(with_food_stats(foods, &ratings))
    }
}
