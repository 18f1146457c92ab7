//! Invalidation planning.
//!
//! Maps a [`Mutation`] to the key families whose payload embeds the changed data.
//! Stateless; the table below is the whole dependency graph between entities and
//! cached responses.

use std::collections::HashSet;
use std::fmt;

use super::events::Mutation;
use super::keys::{KeyFamily, Resource};

/// Key families to evict for one or more mutations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EvictionPlan {
    pub families: HashSet<KeyFamily>,
}

impl fmt::Display for EvictionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.families.iter().map(ToString::to_string).collect();
        names.sort();
        write!(f, "EvictionPlan {{ {} }}", names.join(", "))
    }
}

impl EvictionPlan {
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn contains(&self, family: &KeyFamily) -> bool {
        self.families.contains(family)
    }

    fn all(&mut self, resource: Resource) {
        self.families.insert(KeyFamily::all(resource));
    }

    fn of(&mut self, resource: Resource, id: i64) {
        self.families.insert(KeyFamily::of(resource, id));
    }
}

/// Lookup table from mutation to evicted key families.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidationPolicy;

impl InvalidationPolicy {
    pub fn plan(mutation: &Mutation) -> EvictionPlan {
        let mut plan = EvictionPlan::default();
        Self::extend(&mut plan, mutation);
        plan
    }

    /// Merge the families of several mutations into one plan.
    pub fn plan_all<'a, I>(mutations: I) -> EvictionPlan
    where
        I: IntoIterator<Item = &'a Mutation>,
    {
        let mut plan = EvictionPlan::default();
        for mutation in mutations {
            Self::extend(&mut plan, mutation);
        }
        plan
    }

    fn extend(plan: &mut EvictionPlan, mutation: &Mutation) {
        use Resource::*;

        match *mutation {
            Mutation::FoodReviewCreated {
                food_id,
                restaurant_id,
                ..
            } => food_review_written(plan, food_id, restaurant_id),
            Mutation::FoodReviewDeleted {
                review_id,
                food_id,
                restaurant_id,
            } => {
                food_review_written(plan, food_id, restaurant_id);
                plan.of(FoodReview, review_id);
            }
            Mutation::FoodReviewLikeToggled {
                review_id,
                food_id,
                restaurant_id,
            } => {
                // Like counts only; ratings are untouched.
                plan.all(FoodReviews);
                plan.of(FoodReviewsByFood, food_id);
                plan.of(FoodsByRestaurant, restaurant_id);
                plan.of(FoodReviewsByRestaurant, restaurant_id);
                plan.of(FoodReview, review_id);
            }
            Mutation::GeneralReviewCreated { restaurant_id, .. } => {
                general_review_written(plan, restaurant_id)
            }
            Mutation::GeneralReviewDeleted {
                review_id,
                restaurant_id,
            } => {
                general_review_written(plan, restaurant_id);
                plan.of(GeneralReview, review_id);
            }
            Mutation::GeneralReviewLikeToggled {
                review_id,
                restaurant_id,
            } => {
                plan.all(GeneralReviews);
                plan.of(GeneralReviewsByRestaurant, restaurant_id);
                plan.of(GeneralReview, review_id);
            }
            Mutation::ProfileCreated { .. } => plan.all(Profiles),
            Mutation::ProfileUpdated { profile_id } | Mutation::ProfileDeleted { profile_id } => {
                plan.all(Profiles);
                plan.of(Profile, profile_id);
            }
        }
    }
}

fn food_review_written(plan: &mut EvictionPlan, food_id: i64, restaurant_id: i64) {
    use Resource::*;

    plan.all(FoodReviews);
    plan.all(FoodReviewDetails);
    plan.of(FoodReviewsByFood, food_id);
    plan.of(FoodReviewStats, food_id);
    plan.of(Food, food_id);
    plan.all(Foods);
    plan.of(FoodsByRestaurant, restaurant_id);
    plan.of(FoodReviewsByRestaurant, restaurant_id);
    plan.of(FoodReviewStatsByRestaurant, restaurant_id);
    plan.of(RestaurantStats, restaurant_id);
    plan.all(RestaurantSearch);
}

fn general_review_written(plan: &mut EvictionPlan, restaurant_id: i64) {
    use Resource::*;

    plan.all(GeneralReviews);
    plan.of(GeneralReviewsByRestaurant, restaurant_id);
    plan.of(GeneralReviewStats, restaurant_id);
    plan.of(RestaurantStats, restaurant_id);
    plan.all(RestaurantSearch);
}
