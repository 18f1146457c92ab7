use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::application::error::ServiceError;
use crate::application::pagination::{PageParams, Paginated};
use crate::application::ratings::{group_food_ratings, group_restaurant_ratings, restaurant_stats};
use crate::application::repos::{
    FoodReviewsRepo, FoodsRepo, GeneralReviewsRepo, RepoError, RestaurantsRepo,
};
use crate::domain::entities::{RestaurantReviewRecord, RestaurantSearchHit, RestaurantSummary};
use crate::domain::stats::RestaurantStats;

/// Result of a restaurant search. A blank query falls back to the paginated listing.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RestaurantSearch {
    Listing(Paginated<RestaurantSummary>),
    Hits(Vec<RestaurantSearchHit>),
}

#[derive(Clone)]
pub struct RestaurantService {
    restaurants: Arc<dyn RestaurantsRepo>,
    foods: Arc<dyn FoodsRepo>,
    food_reviews: Arc<dyn FoodReviewsRepo>,
    general_reviews: Arc<dyn GeneralReviewsRepo>,
}

impl RestaurantService {
    pub fn new(
        restaurants: Arc<dyn RestaurantsRepo>,
        foods: Arc<dyn FoodsRepo>,
        food_reviews: Arc<dyn FoodReviewsRepo>,
        general_reviews: Arc<dyn GeneralReviewsRepo>,
    ) -> Self {
        Self {
            restaurants,
            foods,
            food_reviews,
            general_reviews,
        }
    }

    pub async fn list(
        &self,
        page: PageParams,
    ) -> Result<Paginated<RestaurantSummary>, ServiceError> {
        let total = self.restaurants.count_restaurants().await?;
        let rows = self.restaurants.list_restaurants(page).await?;
        Ok(Paginated::new(rows, page, total))
    }

    pub async fn search(
        &self,
        query: Option<&str>,
        page: PageParams,
    ) -> Result<RestaurantSearch, ServiceError> {
        let needle = query.map(str::trim).filter(|needle| !needle.is_empty());
        let Some(needle) = needle else {
            return self.list(page).await.map(RestaurantSearch::Listing);
        };

        let matches = self.restaurants.search_restaurants(needle).await?;
        let ids: Vec<i64> = matches.iter().map(|row| row.restaurant.id).collect();
        let mut stats = self.stats_for(&ids).await?;

        let hits = matches
            .into_iter()
            .map(|row| {
                let stats = stats
                    .remove(&row.restaurant.id)
                    .unwrap_or_else(|| RestaurantStats::compute(std::iter::empty(), &[]));
                RestaurantSearchHit {
                    restaurant: row.restaurant,
                    menu_item_count: row.menu_item_count,
                    stats,
                }
            })
            .collect();
        Ok(RestaurantSearch::Hits(hits))
    }

    pub async fn find(&self, id: i64) -> Result<RestaurantSummary, ServiceError> {
        self.restaurants
            .find_restaurant(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("restaurant"))
    }

    pub async fn stats(&self, id: i64) -> Result<RestaurantStats, ServiceError> {
        self.find(id).await?;
        let mut stats = self.stats_for(&[id]).await?;
        stats
            .remove(&id)
            .ok_or_else(|| ServiceError::from(RepoError::NotFound))
    }

    pub async fn list_legacy_reviews(&self) -> Result<Vec<RestaurantReviewRecord>, ServiceError> {
        Ok(self.restaurants.list_restaurant_reviews().await?)
    }

    async fn stats_for(
        &self,
        restaurant_ids: &[i64],
    ) -> Result<HashMap<i64, RestaurantStats>, ServiceError> {
        if restaurant_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let foods = self.foods.list_foods_by_restaurants(restaurant_ids).await?;
        let food_ids: Vec<i64> = foods.iter().map(|food| food.id).collect();
        let food_ratings = group_food_ratings(self.food_reviews.ratings_for_foods(&food_ids).await?);
        let general_ratings = group_restaurant_ratings(
            self.general_reviews
                .ratings_for_restaurants(restaurant_ids)
                .await?,
        );
        Ok(restaurant_stats(
            restaurant_ids,
            &foods,
            &food_ratings,
            &general_ratings,
        ))
    }
}
