use std::sync::Arc;

use crate::application::food_reviews::FoodReviewService;
use crate::application::foods::FoodService;
use crate::application::general_reviews::GeneralReviewService;
use crate::application::messages::MessageService;
use crate::application::profiles::ProfileService;
use crate::application::repos::HealthProbe;
use crate::application::restaurants::RestaurantService;
use crate::cache::CacheState;

#[derive(Clone)]
pub struct ApiState {
    pub restaurants: Arc<RestaurantService>,
    pub foods: Arc<FoodService>,
    pub food_reviews: Arc<FoodReviewService>,
    pub general_reviews: Arc<GeneralReviewService>,
    pub profiles: Arc<ProfileService>,
    pub messages: Arc<MessageService>,
    pub cache: CacheState,
    pub health: Arc<dyn HealthProbe>,
}
