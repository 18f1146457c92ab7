//! Cache invalidation entry point for write paths.
//!
//! Services call this after a write has committed. A failed write never reaches it.

use std::sync::Arc;

use tracing::{debug, info};

use super::config::CacheConfig;
use super::events::Mutation;
use super::planner::{EvictionPlan, InvalidationPolicy};
use super::store::ResponseCache;

/// Applies [`InvalidationPolicy`] plans to the shared [`ResponseCache`].
///
/// ```ignore
/// // After a successful food review insert:
/// invalidator.food_review_created(review.id, food.id, food.restaurant_id);
/// ```
pub struct CacheInvalidator {
    config: CacheConfig,
    cache: Arc<ResponseCache>,
}

impl CacheInvalidator {
    pub fn new(config: CacheConfig, cache: Arc<ResponseCache>) -> Self {
        Self { config, cache }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Evict every key family touched by `mutation`. Returns the number of removed entries.
    pub fn apply(&self, mutation: Mutation) -> usize {
        if !self.config.is_enabled() {
            debug!(mutation = %mutation, "Cache invalidation skipped: cache disabled");
            return 0;
        }

        let plan = InvalidationPolicy::plan(&mutation);
        let evicted = self.execute(&plan);
        info!(
            mutation = %mutation,
            families = plan.len(),
            evicted,
            "Cache invalidated"
        );
        evicted
    }

    /// Apply several mutations as one merged plan.
    pub fn apply_all(&self, mutations: &[Mutation]) -> usize {
        if mutations.is_empty() {
            return 0;
        }
        if !self.config.is_enabled() {
            debug!(
                mutations = mutations.len(),
                "Cache invalidation skipped: cache disabled"
            );
            return 0;
        }

        let plan = InvalidationPolicy::plan_all(mutations);
        let evicted = self.execute(&plan);
        info!(
            mutations = mutations.len(),
            families = plan.len(),
            evicted,
            "Cache invalidated"
        );
        evicted
    }

    fn execute(&self, plan: &EvictionPlan) -> usize {
        debug!(plan = %plan, "Executing eviction plan");
        plan.families
            .iter()
            .map(|family| self.cache.evict_family(family))
            .sum()
    }

    pub fn food_review_created(&self, review_id: i64, food_id: i64, restaurant_id: i64) {
        self.apply(Mutation::FoodReviewCreated {
            review_id,
            food_id,
            restaurant_id,
        });
    }

    pub fn food_review_deleted(&self, review_id: i64, food_id: i64, restaurant_id: i64) {
        self.apply(Mutation::FoodReviewDeleted {
            review_id,
            food_id,
            restaurant_id,
        });
    }

    pub fn food_review_like_toggled(&self, review_id: i64, food_id: i64, restaurant_id: i64) {
        self.apply(Mutation::FoodReviewLikeToggled {
            review_id,
            food_id,
            restaurant_id,
        });
    }

    pub fn general_review_created(&self, review_id: i64, restaurant_id: i64) {
        self.apply(Mutation::GeneralReviewCreated {
            review_id,
            restaurant_id,
        });
    }

    pub fn general_review_deleted(&self, review_id: i64, restaurant_id: i64) {
        self.apply(Mutation::GeneralReviewDeleted {
            review_id,
            restaurant_id,
        });
    }

    pub fn general_review_like_toggled(&self, review_id: i64, restaurant_id: i64) {
        self.apply(Mutation::GeneralReviewLikeToggled {
            review_id,
            restaurant_id,
        });
    }

    pub fn profile_created(&self, profile_id: i64) {
        self.apply(Mutation::ProfileCreated { profile_id });
    }

    pub fn profile_updated(&self, profile_id: i64) {
        self.apply(Mutation::ProfileUpdated { profile_id });
    }

    pub fn profile_deleted(&self, profile_id: i64) {
        self.apply(Mutation::ProfileDeleted { profile_id });
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cache::keys::{CacheKey, Resource};

    fn seeded() -> Arc<ResponseCache> {
        let cache = Arc::new(ResponseCache::new());
        cache.set(CacheKey::with_id(Resource::FoodReviewsByFood, 5), json!([]), None);
        cache.set(CacheKey::with_id(Resource::RestaurantStats, 9), json!({}), None);
        cache.set(CacheKey::with_id(Resource::Restaurant, 9), json!({}), None);
        cache
    }

    #[test]
    fn created_review_evicts_dependent_keys() {
        let cache = seeded();
        let invalidator = CacheInvalidator::new(CacheConfig::default(), Arc::clone(&cache));

        invalidator.food_review_created(1, 5, 9);

        assert!(cache.get(&CacheKey::with_id(Resource::FoodReviewsByFood, 5)).is_none());
        assert!(cache.get(&CacheKey::with_id(Resource::RestaurantStats, 9)).is_none());
        assert!(cache.get(&CacheKey::with_id(Resource::Restaurant, 9)).is_some());
    }

    #[test]
    fn disabled_cache_skips_eviction() {
        let cache = seeded();
        let config = CacheConfig {
            enabled: false,
            ..Default::default()
        };
        let invalidator = CacheInvalidator::new(config, Arc::clone(&cache));

        assert_eq!(
            invalidator.apply(Mutation::FoodReviewCreated {
                review_id: 1,
                food_id: 5,
                restaurant_id: 9,
            }),
            0
        );
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn apply_all_counts_each_entry_once() {
        let cache = seeded();
        let invalidator = CacheInvalidator::new(CacheConfig::default(), Arc::clone(&cache));
        let mutation = Mutation::FoodReviewDeleted {
            review_id: 1,
            food_id: 5,
            restaurant_id: 9,
        };

        assert_eq!(invalidator.apply_all(&[mutation, mutation]), 2);
        assert_eq!(cache.len(), 1);
    }
}
