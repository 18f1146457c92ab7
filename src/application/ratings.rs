//! Grouping raw rating rows and feeding them through the stats engine.

use std::collections::HashMap;

use crate::domain::entities::{FoodRating, FoodRecord, FoodWithStats, RestaurantRating};
use crate::domain::stats::{FoodRatings, FoodStats, RatingSummary, RestaurantStats};

pub type RatingsById = HashMap<i64, Vec<i32>>;

pub fn group_food_ratings(rows: Vec<FoodRating>) -> RatingsById {
    let mut grouped = RatingsById::new();
    for row in rows {
        grouped.entry(row.food_id).or_default().push(row.rating);
    }
    grouped
}

pub fn group_restaurant_ratings(rows: Vec<RestaurantRating>) -> RatingsById {
    let mut grouped = RatingsById::new();
    for row in rows {
        grouped.entry(row.restaurant_id).or_default().push(row.rating);
    }
    grouped
}

fn ratings_of(ratings: &RatingsById, id: i64) -> &[i32] {
    ratings.get(&id).map(Vec::as_slice).unwrap_or(&[])
}

pub fn summary_of(ratings: &RatingsById, id: i64) -> RatingSummary {
    RatingSummary::from_ratings(ratings_of(ratings, id).iter().copied())
}

/// Attach per-food stats, keeping the input order.
pub fn with_food_stats(foods: Vec<FoodRecord>, ratings: &RatingsById) -> Vec<FoodWithStats> {
    foods
        .into_iter()
        .map(|food| {
            let stats = FoodStats::compute(ratings_of(ratings, food.id), food.price);
            FoodWithStats { food, stats }
        })
        .collect()
}

/// Restaurant aggregates for every id in `restaurant_ids`.
///
/// `foods` may span several restaurants; `food_ratings` is keyed by food id and
/// `general_ratings` by restaurant id.
pub fn restaurant_stats(
    restaurant_ids: &[i64],
    foods: &[FoodRecord],
    food_ratings: &RatingsById,
    general_ratings: &RatingsById,
) -> HashMap<i64, RestaurantStats> {
    restaurant_ids
        .iter()
        .map(|&restaurant_id| {
            let menu = foods
                .iter()
                .filter(|food| food.restaurant_id == restaurant_id)
                .map(|food| FoodRatings {
                    price: food.price,
                    ratings: ratings_of(food_ratings, food.id),
                });
            let stats = RestaurantStats::compute(menu, ratings_of(general_ratings, restaurant_id));
            (restaurant_id, stats)
        })
        .collect()
}
