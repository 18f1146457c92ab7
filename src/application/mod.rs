//! Application services layer.

pub mod error;
pub mod food_reviews;
pub mod foods;
pub mod general_reviews;
pub mod identity;
pub mod messages;
pub mod pagination;
pub mod profiles;
pub mod ratings;
pub mod repos;
pub mod restaurants;
