//! Derived rating and value aggregates.
//!
//! Everything here is pure: callers fetch raw review rows and the aggregates are
//! recomputed on every miss. Division by a price only happens behind the
//! `review_count > 0 && price > 0` guard in [`value_score`].

use serde::Serialize;

/// Review count and mean rating over one set of reviews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub review_count: i64,
    /// Arithmetic mean of the ratings, `0.0` when there are no reviews.
    pub average_rating: f64,
}

impl RatingSummary {
    pub const EMPTY: Self = Self {
        review_count: 0,
        average_rating: 0.0,
    };

    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let (count, sum) = ratings
            .into_iter()
            .fold((0_i64, 0_i64), |(count, sum), rating| {
                (count + 1, sum + i64::from(rating))
            });

        if count == 0 {
            return Self::EMPTY;
        }

        Self {
            review_count: count,
            average_rating: sum as f64 / count as f64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.review_count == 0
    }
}

impl Default for RatingSummary {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Rating divided by price; `None` unless the food has reviews and a positive price.
pub fn value_score(summary: &RatingSummary, price: Option<f64>) -> Option<f64> {
    let price = price.filter(|price| price.is_finite() && *price > 0.0)?;
    if summary.is_empty() {
        return None;
    }
    Some(summary.average_rating / price)
}

/// Per-food aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FoodStats {
    pub review_count: i64,
    pub average_rating: f64,
    pub value: Option<f64>,
}

impl FoodStats {
    pub fn compute(ratings: &[i32], price: Option<f64>) -> Self {
        Self::from_summary(RatingSummary::from_ratings(ratings.iter().copied()), price)
    }

    pub fn from_summary(summary: RatingSummary, price: Option<f64>) -> Self {
        Self {
            review_count: summary.review_count,
            average_rating: summary.average_rating,
            value: value_score(&summary, price),
        }
    }
}

/// Ratings left on one food together with its price.
#[derive(Debug, Clone, Copy)]
pub struct FoodRatings<'a> {
    pub price: Option<f64>,
    pub ratings: &'a [i32],
}

/// Restaurant-wide aggregate over food reviews and general reviews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RestaurantStats {
    pub average_rating: f64,
    pub review_count: i64,
    /// Mean of the `value` of every food that has one. Foods without a value are skipped.
    pub average_value: Option<f64>,
}

impl RestaurantStats {
    pub fn compute<'a, I>(foods: I, general_ratings: &[i32]) -> Self
    where
        I: IntoIterator<Item = FoodRatings<'a>>,
    {
        let mut all_ratings: Vec<i32> = general_ratings.to_vec();
        let mut value_sum = 0.0;
        let mut value_count = 0_u32;

        for food in foods {
            all_ratings.extend_from_slice(food.ratings);
            let summary = RatingSummary::from_ratings(food.ratings.iter().copied());
            if let Some(value) = value_score(&summary, food.price) {
                value_sum += value;
                value_count += 1;
            }
        }

        let summary = RatingSummary::from_ratings(all_ratings);
        let average_value = (value_count > 0).then(|| value_sum / f64::from(value_count));

        Self {
            average_rating: summary.average_rating,
            review_count: summary.review_count,
            average_value,
        }
    }
}
