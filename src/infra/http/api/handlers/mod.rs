//! API handlers organized by resource type.
//!
//! Handlers stay thin: extract, call the service, convert errors with
//! [`ApiError::from`](crate::infra::http::api::error::ApiError).

mod cache;
mod food_reviews;
mod foods;
mod general_reviews;
mod messages;
mod profiles;
mod restaurants;
mod system;

pub use cache::*;
pub use food_reviews::*;
pub use foods::*;
pub use general_reviews::*;
pub use messages::*;
pub use profiles::*;
pub use restaurants::*;
pub use system::*;
