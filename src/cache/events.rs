//! Mutation events that drive cache invalidation.
//!
//! Each variant carries the identifiers its fan-out needs, already resolved by
//! the service that performed the write (review → food → restaurant).

use std::fmt;

/// A committed write that may have made cached responses stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    FoodReviewCreated {
        review_id: i64,
        food_id: i64,
        restaurant_id: i64,
    },
    FoodReviewDeleted {
        review_id: i64,
        food_id: i64,
        restaurant_id: i64,
    },
    FoodReviewLikeToggled {
        review_id: i64,
        food_id: i64,
        restaurant_id: i64,
    },
    GeneralReviewCreated {
        review_id: i64,
        restaurant_id: i64,
    },
    GeneralReviewDeleted {
        review_id: i64,
        restaurant_id: i64,
    },
    GeneralReviewLikeToggled {
        review_id: i64,
        restaurant_id: i64,
    },
    ProfileCreated {
        profile_id: i64,
    },
    ProfileUpdated {
        profile_id: i64,
    },
    ProfileDeleted {
        profile_id: i64,
    },
}

impl Mutation {
    /// Stable name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FoodReviewCreated { .. } => "food_review_created",
            Self::FoodReviewDeleted { .. } => "food_review_deleted",
            Self::FoodReviewLikeToggled { .. } => "food_review_like_toggled",
            Self::GeneralReviewCreated { .. } => "general_review_created",
            Self::GeneralReviewDeleted { .. } => "general_review_deleted",
            Self::GeneralReviewLikeToggled { .. } => "general_review_like_toggled",
            Self::ProfileCreated { .. } => "profile_created",
            Self::ProfileUpdated { .. } => "profile_updated",
            Self::ProfileDeleted { .. } => "profile_deleted",
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}
