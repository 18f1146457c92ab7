pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

pub use state::ApiState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};

use crate::cache::response_cache_layer;
use crate::infra::http::middleware::{log_responses, set_request_context};

/// Full PolyBites router.
///
/// Layers, outermost first: request context, response logging, response cache.
pub fn build_router(state: ApiState) -> Router {
    let cache_state = state.cache.clone();

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(restaurant_routes())
        .merge(food_routes())
        .merge(food_review_routes())
        .merge(general_review_routes())
        .merge(profile_routes())
        .merge(message_routes())
        .route("/api/cache", delete(handlers::flush_cache))
        .route("/api/cache/stats", get(handlers::cache_stats))
        .with_state(state)
        .layer(axum_middleware::from_fn_with_state(
            cache_state,
            response_cache_layer,
        ))
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

fn restaurant_routes() -> Router<ApiState> {
    Router::new()
        .route("/api/restaurants", get(handlers::list_restaurants))
        .route("/api/restaurants/search", get(handlers::search_restaurants))
        .route("/api/restaurants/{id}", get(handlers::get_restaurant))
        .route(
            "/api/restaurants/{id}/stats",
            get(handlers::get_restaurant_stats),
        )
        .route(
            "/api/restaurant-reviews",
            get(handlers::list_restaurant_reviews),
        )
}

fn food_routes() -> Router<ApiState> {
    Router::new()
        .route("/api/foods", get(handlers::list_foods))
        .route("/api/foods/{id}", get(handlers::get_food))
        .route(
            "/api/foods/restaurant/{restaurant_id}",
            get(handlers::list_foods_by_restaurant),
        )
        .route(
            "/api/foods/restaurant/{restaurant_id}/search",
            get(handlers::search_foods_by_restaurant),
        )
}

fn food_review_routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/api/food-reviews",
            get(handlers::list_food_reviews).post(handlers::create_food_review),
        )
        .route(
            "/api/food-reviews/food-review-details",
            get(handlers::food_review_details),
        )
        .route(
            "/api/food-reviews/food/{food_id}",
            get(handlers::list_food_reviews_by_food),
        )
        .route(
            "/api/food-reviews/food/{food_id}/stats",
            get(handlers::food_review_stats),
        )
        .route(
            "/api/food-reviews/restaurant/{restaurant_id}",
            get(handlers::list_food_reviews_by_restaurant),
        )
        .route(
            "/api/food-reviews/restaurant/{restaurant_id}/stats",
            get(handlers::food_review_stats_by_restaurant),
        )
        .route(
            "/api/food-reviews/user/{user_id}",
            get(handlers::list_food_reviews_by_user),
        )
        .route(
            "/api/food-reviews/{id}",
            get(handlers::get_food_review).delete(handlers::delete_food_review),
        )
        .route(
            "/api/food-reviews/{id}/likes",
            get(handlers::food_review_likes),
        )
        .route(
            "/api/food-reviews/{id}/like/{user_id}",
            get(handlers::food_review_liked_by),
        )
        .route(
            "/api/food-reviews/{id}/toggle-like",
            post(handlers::toggle_food_review_like),
        )
}

fn general_review_routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/api/general-reviews",
            get(handlers::list_general_reviews).post(handlers::create_general_review),
        )
        .route(
            "/api/general-reviews/report",
            post(handlers::report_general_review),
        )
        .route(
            "/api/general-reviews/restaurant/{restaurant_id}",
            get(handlers::list_general_reviews_by_restaurant),
        )
        .route(
            "/api/general-reviews/restaurant/{restaurant_id}/stats",
            get(handlers::general_review_stats),
        )
        .route(
            "/api/general-reviews/user/{user_id}",
            get(handlers::list_general_reviews_by_user),
        )
        .route(
            "/api/general-reviews/{id}",
            get(handlers::get_general_review).delete(handlers::delete_general_review),
        )
        .route(
            "/api/general-reviews/{id}/likes",
            get(handlers::general_review_likes),
        )
        .route(
            "/api/general-reviews/{id}/like/{user_id}",
            get(handlers::general_review_liked_by),
        )
        .route(
            "/api/general-reviews/{id}/toggle-like",
            post(handlers::toggle_general_review_like),
        )
}

fn profile_routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/api/profiles",
            get(handlers::list_profiles).post(handlers::create_profile),
        )
        .route("/api/profiles/check-user", get(handlers::check_user))
        .route(
            "/api/profiles/auth/{auth_id}",
            get(handlers::get_profile_by_auth)
                .put(handlers::update_profile)
                .delete(handlers::delete_profile),
        )
        .route("/api/profiles/{id}", get(handlers::get_profile))
}

fn message_routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/api/messages",
            get(handlers::list_messages).post(handlers::create_message),
        )
        .route("/api/messages/{id}", get(handlers::get_message))
}
