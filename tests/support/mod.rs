//! In-memory repositories and router wiring shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, Response, header},
};
use polybites::{
    application::{
        food_reviews::FoodReviewService,
        foods::FoodService,
        general_reviews::GeneralReviewService,
        identity::{IdentityError, IdentityProvider},
        messages::MessageService,
        pagination::PageParams,
        profiles::ProfileService,
        repos::{
            CreateFoodReviewParams, CreateGeneralReviewParams, CreateMessageParams,
            CreateReportParams, FoodReviewsRepo, FoodsRepo, GeneralReviewsRepo, HealthProbe,
            LikeToggle, MessagesRepo, ProfilesRepo, RepoError, RestaurantsRepo,
        },
        restaurants::RestaurantService,
    },
    cache::{CacheConfig, CacheInvalidator, CacheState, ResponseCache},
    domain::entities::{
        FoodRating, FoodRecord, FoodReviewRecord, FoodReviewScope, FoodReviewView,
        GeneralReviewRecord, GeneralReviewReportRecord, GeneralReviewView, MessageRecord,
        MessageView, ProfileAccount, ProfileRecord, RestaurantFoodReview, RestaurantRating,
        RestaurantRecord, RestaurantReviewRecord, RestaurantSummary, UserFoodReview,
        UserGeneralReview,
    },
    infra::http::{ApiState, build_router},
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default)]
struct Data {
    next_id: i64,
    restaurants: Vec<RestaurantRecord>,
    foods: Vec<FoodRecord>,
    food_reviews: Vec<FoodReviewRecord>,
    food_likes: HashSet<(i64, Uuid)>,
    general_reviews: Vec<GeneralReviewRecord>,
    general_likes: HashSet<(i64, Uuid)>,
    reports: Vec<GeneralReviewReportRecord>,
    legacy_reviews: Vec<RestaurantReviewRecord>,
    profiles: Vec<ProfileAccount>,
    auth_users: Vec<(Uuid, String)>,
    messages: Vec<MessageRecord>,
    fail_writes: bool,
    down: bool,
}

impl Data {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        1000 + self.next_id
    }

    fn summary(&self, restaurant: &RestaurantRecord) -> RestaurantSummary {
        RestaurantSummary {
            restaurant: restaurant.clone(),
            menu_item_count: self
                .foods
                .iter()
                .filter(|food| food.restaurant_id == restaurant.id)
                .count() as i64,
        }
    }

    fn food_view(&self, review: &FoodReviewRecord) -> FoodReviewView {
        FoodReviewView {
            review: review.clone(),
            like_count: self
                .food_likes
                .iter()
                .filter(|(id, _)| *id == review.id)
                .count() as i64,
        }
    }

    fn general_view(&self, review: &GeneralReviewRecord) -> GeneralReviewView {
        GeneralReviewView {
            review: review.clone(),
            like_count: self
                .general_likes
                .iter()
                .filter(|(id, _)| *id == review.id)
                .count() as i64,
        }
    }

    fn check_write(&self) -> Result<(), RepoError> {
        if self.fail_writes {
            return Err(RepoError::Persistence("write rejected by test store".into()));
        }
        Ok(())
    }
}

/// Thread-safe in-memory stand-in for the Postgres repositories.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Data>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn with<R>(&self, f: impl FnOnce(&mut Data) -> R) -> R {
        let mut data = self.data.lock().expect("store lock");
        f(&mut data)
    }

    pub fn add_restaurant(&self, id: i64, name: &str) {
        self.with(|data| {
            data.restaurants.push(RestaurantRecord {
                id,
                name: name.to_string(),
                description: Some(format!("{name} kitchen")),
                location: None,
                image_url: None,
                created_at: OffsetDateTime::UNIX_EPOCH,
            })
        });
    }

    pub fn add_food(&self, id: i64, restaurant_id: i64, name: &str, price: Option<f64>) {
        self.with(|data| {
            data.foods.push(FoodRecord {
                id,
                restaurant_id,
                name: name.to_string(),
                description: None,
                price,
                food_type: Some("entree".into()),
                image_url: None,
                created_at: OffsetDateTime::UNIX_EPOCH,
            })
        });
    }

    pub fn add_food_review(&self, user_id: Uuid, food_id: i64, rating: i32) -> i64 {
        self.with(|data| {
            let id = data.next_id();
            data.food_reviews.push(FoodReviewRecord {
                id,
                user_id,
                food_id,
                rating,
                text: None,
                anonymous: false,
                created_at: OffsetDateTime::UNIX_EPOCH,
            });
            id
        })
    }

    pub fn add_general_review(&self, user_id: Uuid, restaurant_id: i64, rating: i32) -> i64 {
        self.with(|data| {
            let id = data.next_id();
            data.general_reviews.push(GeneralReviewRecord {
                id,
                user_id,
                restaurant_id,
                rating,
                text: None,
                anonymous: false,
                created_at: OffsetDateTime::UNIX_EPOCH,
            });
            id
        })
    }

    pub fn add_auth_user(&self, id: Uuid, email: &str) {
        self.with(|data| data.auth_users.push((id, email.to_string())));
    }

    pub fn add_profile(&self, auth_id: Uuid, name: &str) -> i64 {
        self.with(|data| {
            let id = data.next_id();
            data.profiles.push(ProfileAccount {
                id,
                auth_id,
                name: name.to_string(),
                name_change: 1,
                created_at: OffsetDateTime::UNIX_EPOCH,
            });
            id
        })
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.with(|data| data.fail_writes = fail);
    }

    pub fn set_down(&self, down: bool) {
        self.with(|data| data.down = down);
    }

    pub fn food_review_count(&self) -> usize {
        self.with(|data| data.food_reviews.len())
    }
}

#[async_trait]
impl RestaurantsRepo for MemoryStore {
    async fn count_restaurants(&self) -> Result<i64, RepoError> {
        Ok(self.with(|data| data.restaurants.len() as i64))
    }

    async fn list_restaurants(&self, page: PageParams) -> Result<Vec<RestaurantSummary>, RepoError> {
        Ok(self.with(|data| {
            data.restaurants
                .iter()
                .skip(page.offset() as usize)
                .take(page.limit as usize)
                .map(|restaurant| data.summary(restaurant))
                .collect()
        }))
    }

    async fn list_all_restaurants(&self) -> Result<Vec<RestaurantSummary>, RepoError> {
        Ok(self.with(|data| {
            data.restaurants
                .iter()
                .map(|restaurant| data.summary(restaurant))
                .collect()
        }))
    }

    async fn search_restaurants(&self, needle: &str) -> Result<Vec<RestaurantSummary>, RepoError> {
        let needle = needle.to_lowercase();
        Ok(self.with(|data| {
            data.restaurants
                .iter()
                .filter(|restaurant| {
                    restaurant.name.to_lowercase().contains(&needle)
                        || restaurant
                            .description
                            .as_deref()
                            .is_some_and(|text| text.to_lowercase().contains(&needle))
                })
                .map(|restaurant| data.summary(restaurant))
                .collect()
        }))
    }

    async fn find_restaurant(&self, id: i64) -> Result<Option<RestaurantSummary>, RepoError> {
        Ok(self.with(|data| {
            data.restaurants
                .iter()
                .find(|restaurant| restaurant.id == id)
                .map(|restaurant| data.summary(restaurant))
        }))
    }

    async fn list_restaurant_reviews(&self) -> Result<Vec<RestaurantReviewRecord>, RepoError> {
        Ok(self.with(|data| data.legacy_reviews.clone()))
    }
}

#[async_trait]
impl FoodsRepo for MemoryStore {
    async fn list_foods(&self) -> Result<Vec<FoodRecord>, RepoError> {
        Ok(self.with(|data| data.foods.clone()))
    }

    async fn list_foods_by_restaurants(
        &self,
        restaurant_ids: &[i64],
    ) -> Result<Vec<FoodRecord>, RepoError> {
        Ok(self.with(|data| {
            data.foods
                .iter()
                .filter(|food| restaurant_ids.contains(&food.restaurant_id))
                .cloned()
                .collect()
        }))
    }

    async fn find_food(&self, id: i64) -> Result<Option<FoodRecord>, RepoError> {
        Ok(self.with(|data| data.foods.iter().find(|food| food.id == id).cloned()))
    }
}

#[async_trait]
impl FoodReviewsRepo for MemoryStore {
    async fn ratings_for_foods(&self, food_ids: &[i64]) -> Result<Vec<FoodRating>, RepoError> {
        Ok(self.with(|data| {
            data.food_reviews
                .iter()
                .filter(|review| food_ids.contains(&review.food_id))
                .map(|review| FoodRating {
                    food_id: review.food_id,
                    rating: review.rating,
                })
                .collect()
        }))
    }

    async fn list_reviews(&self) -> Result<Vec<FoodReviewView>, RepoError> {
        Ok(self.with(|data| {
            data.food_reviews
                .iter()
                .map(|review| data.food_view(review))
                .collect()
        }))
    }

    async fn list_reviews_by_food(&self, food_id: i64) -> Result<Vec<FoodReviewView>, RepoError> {
        Ok(self.with(|data| {
            data.food_reviews
                .iter()
                .filter(|review| review.food_id == food_id)
                .map(|review| data.food_view(review))
                .collect()
        }))
    }

    async fn list_reviews_by_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<RestaurantFoodReview>, RepoError> {
        Ok(self.with(|data| {
            data.food_reviews
                .iter()
                .filter_map(|review| {
                    let food = data.foods.iter().find(|food| food.id == review.food_id)?;
                    (food.restaurant_id == restaurant_id).then(|| RestaurantFoodReview {
                        review: data.food_view(review),
                        food_name: food.name.clone(),
                    })
                })
                .collect()
        }))
    }

    async fn list_reviews_by_user(&self, user_id: Uuid) -> Result<Vec<UserFoodReview>, RepoError> {
        Ok(self.with(|data| {
            data.food_reviews
                .iter()
                .rev()
                .filter(|review| review.user_id == user_id)
                .filter_map(|review| {
                    let food = data.foods.iter().find(|food| food.id == review.food_id)?;
                    let restaurant = data
                        .restaurants
                        .iter()
                        .find(|restaurant| restaurant.id == food.restaurant_id)?;
                    Some(UserFoodReview {
                        review: data.food_view(review),
                        food_name: food.name.clone(),
                        food_type: food.food_type.clone(),
                        restaurant_id: restaurant.id,
                        restaurant_name: restaurant.name.clone(),
                    })
                })
                .collect()
        }))
    }

    async fn find_review(&self, id: i64) -> Result<Option<FoodReviewView>, RepoError> {
        Ok(self.with(|data| {
            data.food_reviews
                .iter()
                .find(|review| review.id == id)
                .map(|review| data.food_view(review))
        }))
    }

    async fn create_review(
        &self,
        params: CreateFoodReviewParams,
    ) -> Result<FoodReviewRecord, RepoError> {
        self.with(|data| {
            data.check_write()?;
            let review = FoodReviewRecord {
                id: data.next_id(),
                user_id: params.user_id,
                food_id: params.food_id,
                rating: params.rating,
                text: params.text,
                anonymous: params.anonymous,
                created_at: OffsetDateTime::UNIX_EPOCH,
            };
            data.food_reviews.push(review.clone());
            Ok(review)
        })
    }

    async fn delete_review(&self, id: i64) -> Result<(), RepoError> {
        self.with(|data| {
            data.check_write()?;
            data.food_likes.retain(|(review_id, _)| *review_id != id);
            let before = data.food_reviews.len();
            data.food_reviews.retain(|review| review.id != id);
            if data.food_reviews.len() == before {
                return Err(RepoError::NotFound);
            }
            Ok(())
        })
    }

    async fn delete_reviews_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FoodReviewScope>, RepoError> {
        self.with(|data| {
            data.check_write()?;
            let doomed: Vec<FoodReviewScope> = data
                .food_reviews
                .iter()
                .filter(|review| review.user_id == user_id)
                .filter_map(|review| {
                    let food = data.foods.iter().find(|food| food.id == review.food_id)?;
                    Some(FoodReviewScope {
                        review_id: review.id,
                        food_id: review.food_id,
                        restaurant_id: food.restaurant_id,
                    })
                })
                .collect();
            data.food_likes
                .retain(|(review_id, _)| !doomed.iter().any(|scope| scope.review_id == *review_id));
            data.food_reviews
                .retain(|review| !doomed.iter().any(|scope| scope.review_id == review.id));
            Ok(doomed)
        })
    }

    async fn count_likes(&self, review_id: i64) -> Result<i64, RepoError> {
        Ok(self.with(|data| {
            data.food_likes
                .iter()
                .filter(|(id, _)| *id == review_id)
                .count() as i64
        }))
    }

    async fn has_liked(&self, review_id: i64, user_id: Uuid) -> Result<bool, RepoError> {
        Ok(self.with(|data| data.food_likes.contains(&(review_id, user_id))))
    }

    async fn toggle_like(&self, review_id: i64, user_id: Uuid) -> Result<LikeToggle, RepoError> {
        self.with(|data| {
            data.check_write()?;
            let liked = if data.food_likes.remove(&(review_id, user_id)) {
                false
            } else {
                data.food_likes.insert((review_id, user_id));
                true
            };
            let likes = data
                .food_likes
                .iter()
                .filter(|(id, _)| *id == review_id)
                .count() as i64;
            Ok(LikeToggle { likes, liked })
        })
    }
}

#[async_trait]
impl GeneralReviewsRepo for MemoryStore {
    async fn ratings_for_restaurants(
        &self,
        restaurant_ids: &[i64],
    ) -> Result<Vec<RestaurantRating>, RepoError> {
        Ok(self.with(|data| {
            data.general_reviews
                .iter()
                .filter(|review| restaurant_ids.contains(&review.restaurant_id))
                .map(|review| RestaurantRating {
                    restaurant_id: review.restaurant_id,
                    rating: review.rating,
                })
                .collect()
        }))
    }

    async fn list_reviews(&self) -> Result<Vec<GeneralReviewView>, RepoError> {
        Ok(self.with(|data| {
            data.general_reviews
                .iter()
                .map(|review| data.general_view(review))
                .collect()
        }))
    }

    async fn list_reviews_by_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<GeneralReviewView>, RepoError> {
        Ok(self.with(|data| {
            data.general_reviews
                .iter()
                .filter(|review| review.restaurant_id == restaurant_id)
                .map(|review| data.general_view(review))
                .collect()
        }))
    }

    async fn list_reviews_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserGeneralReview>, RepoError> {
        Ok(self.with(|data| {
            data.general_reviews
                .iter()
                .rev()
                .filter(|review| review.user_id == user_id)
                .filter_map(|review| {
                    let restaurant = data
                        .restaurants
                        .iter()
                        .find(|restaurant| restaurant.id == review.restaurant_id)?;
                    Some(UserGeneralReview {
                        review: data.general_view(review),
                        restaurant_name: restaurant.name.clone(),
                    })
                })
                .collect()
        }))
    }

    async fn find_review(&self, id: i64) -> Result<Option<GeneralReviewView>, RepoError> {
        Ok(self.with(|data| {
            data.general_reviews
                .iter()
                .find(|review| review.id == id)
                .map(|review| data.general_view(review))
        }))
    }

    async fn create_review(
        &self,
        params: CreateGeneralReviewParams,
    ) -> Result<GeneralReviewRecord, RepoError> {
        self.with(|data| {
            data.check_write()?;
            let review = GeneralReviewRecord {
                id: data.next_id(),
                user_id: params.user_id,
                restaurant_id: params.restaurant_id,
                rating: params.rating,
                text: params.text,
                anonymous: params.anonymous,
                created_at: OffsetDateTime::UNIX_EPOCH,
            };
            data.general_reviews.push(review.clone());
            Ok(review)
        })
    }

    async fn delete_review(&self, id: i64) -> Result<(), RepoError> {
        self.with(|data| {
            data.check_write()?;
            data.general_likes.retain(|(review_id, _)| *review_id != id);
            let before = data.general_reviews.len();
            data.general_reviews.retain(|review| review.id != id);
            if data.general_reviews.len() == before {
                return Err(RepoError::NotFound);
            }
            Ok(())
        })
    }

    async fn count_likes(&self, review_id: i64) -> Result<i64, RepoError> {
        Ok(self.with(|data| {
            data.general_likes
                .iter()
                .filter(|(id, _)| *id == review_id)
                .count() as i64
        }))
    }

    async fn has_liked(&self, review_id: i64, user_id: Uuid) -> Result<bool, RepoError> {
        Ok(self.with(|data| data.general_likes.contains(&(review_id, user_id))))
    }

    async fn toggle_like(&self, review_id: i64, user_id: Uuid) -> Result<LikeToggle, RepoError> {
        self.with(|data| {
            data.check_write()?;
            let liked = if data.general_likes.remove(&(review_id, user_id)) {
                false
            } else {
                data.general_likes.insert((review_id, user_id));
                true
            };
            let likes = data
                .general_likes
                .iter()
                .filter(|(id, _)| *id == review_id)
                .count() as i64;
            Ok(LikeToggle { likes, liked })
        })
    }

    async fn create_report(
        &self,
        params: CreateReportParams,
    ) -> Result<GeneralReviewReportRecord, RepoError> {
        self.with(|data| {
            data.check_write()?;
            let report = GeneralReviewReportRecord {
                id: data.next_id(),
                general_review_id: params.general_review_id,
                reason: params.reason,
                user_id: params.user_id,
                created_at: OffsetDateTime::UNIX_EPOCH,
            };
            data.reports.push(report.clone());
            Ok(report)
        })
    }
}

fn public_profile(account: &ProfileAccount) -> ProfileRecord {
    ProfileRecord {
        id: account.id,
        name: account.name.clone(),
        created_at: account.created_at,
    }
}

#[async_trait]
impl ProfilesRepo for MemoryStore {
    async fn list_profiles(&self) -> Result<Vec<ProfileRecord>, RepoError> {
        Ok(self.with(|data| data.profiles.iter().map(public_profile).collect()))
    }

    async fn find_profile(&self, id: i64) -> Result<Option<ProfileRecord>, RepoError> {
        Ok(self.with(|data| {
            data.profiles
                .iter()
                .find(|profile| profile.id == id)
                .map(public_profile)
        }))
    }

    async fn find_by_auth_id(&self, auth_id: Uuid) -> Result<Option<ProfileAccount>, RepoError> {
        Ok(self.with(|data| {
            data.profiles
                .iter()
                .find(|profile| profile.auth_id == auth_id)
                .cloned()
        }))
    }

    async fn create_profile(&self, name: &str, auth_id: Uuid) -> Result<ProfileRecord, RepoError> {
        self.with(|data| {
            data.check_write()?;
            if data.profiles.iter().any(|profile| profile.auth_id == auth_id) {
                return Err(RepoError::Duplicate {
                    constraint: "profiles_auth_id_key".into(),
                });
            }
            let account = ProfileAccount {
                id: data.next_id(),
                auth_id,
                name: name.to_string(),
                name_change: 1,
                created_at: OffsetDateTime::UNIX_EPOCH,
            };
            data.profiles.push(account.clone());
            Ok(public_profile(&account))
        })
    }

    async fn rename_profile(
        &self,
        auth_id: Uuid,
        name: &str,
    ) -> Result<Option<ProfileAccount>, RepoError> {
        self.with(|data| {
            data.check_write()?;
            Ok(data
                .profiles
                .iter_mut()
                .find(|profile| profile.auth_id == auth_id && profile.name_change > 0)
                .map(|profile| {
                    profile.name = name.to_string();
                    profile.name_change = 0;
                    profile.clone()
                }))
        })
    }

    async fn delete_profile(&self, auth_id: Uuid) -> Result<Option<ProfileAccount>, RepoError> {
        self.with(|data| {
            data.check_write()?;
            let position = data
                .profiles
                .iter()
                .position(|profile| profile.auth_id == auth_id);
            Ok(position.map(|index| data.profiles.remove(index)))
        })
    }

    async fn auth_user_exists(&self, auth_id: Uuid) -> Result<bool, RepoError> {
        Ok(self.with(|data| data.auth_users.iter().any(|(id, _)| *id == auth_id)))
    }

    async fn email_registered(&self, email: &str) -> Result<bool, RepoError> {
        Ok(self.with(|data| {
            data.auth_users
                .iter()
                .any(|(_, known)| known.eq_ignore_ascii_case(email))
        }))
    }
}

#[async_trait]
impl MessagesRepo for MemoryStore {
    async fn create_message(&self, params: CreateMessageParams) -> Result<MessageRecord, RepoError> {
        self.with(|data| {
            data.check_write()?;
            let message = MessageRecord {
                id: data.next_id(),
                profile_id: params.profile_id,
                subject: params.subject,
                message: params.message,
                created_at: OffsetDateTime::UNIX_EPOCH,
            };
            data.messages.push(message.clone());
            Ok(message)
        })
    }

    async fn list_messages(&self) -> Result<Vec<MessageView>, RepoError> {
        Ok(self.with(|data| {
            data.messages
                .iter()
                .map(|message| MessageView {
                    message: message.clone(),
                    user_name: message.profile_id.and_then(|id| {
                        data.profiles
                            .iter()
                            .find(|profile| profile.id == id)
                            .map(|profile| profile.name.clone())
                    }),
                })
                .collect()
        }))
    }

    async fn find_message(&self, id: i64) -> Result<Option<MessageView>, RepoError> {
        Ok(self.list_messages().await?.into_iter().find(|view| view.message.id == id))
    }
}

#[async_trait]
impl HealthProbe for MemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.with(|data| data.down) {
            return Err(RepoError::Timeout);
        }
        Ok(())
    }
}

/// Identity provider that records deletions and can be told to fail.
#[derive(Default)]
pub struct RecordingIdentity {
    pub deleted: Mutex<Vec<Uuid>>,
    pub fail: bool,
}

#[async_trait]
impl IdentityProvider for RecordingIdentity {
    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError> {
        if self.fail {
            return Err(IdentityError::Rejected {
                status: 500,
                message: "provider unavailable".into(),
            });
        }
        self.deleted.lock().expect("identity lock").push(user_id);
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub cache: Arc<ResponseCache>,
    pub identity: Arc<RecordingIdentity>,
}

impl TestApp {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self::with_identity(store, Arc::new(RecordingIdentity::default()))
    }

    pub fn with_identity(store: Arc<MemoryStore>, identity: Arc<RecordingIdentity>) -> Self {
        let config = CacheConfig::default();
        let cache = Arc::new(ResponseCache::new());
        let invalidator = Arc::new(CacheInvalidator::new(config.clone(), cache.clone()));

        let state = ApiState {
            restaurants: Arc::new(RestaurantService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
            )),
            foods: Arc::new(FoodService::new(store.clone(), store.clone())),
            food_reviews: Arc::new(
                FoodReviewService::new(store.clone(), store.clone(), store.clone())
                    .with_cache_invalidator(invalidator.clone()),
            ),
            general_reviews: Arc::new(
                GeneralReviewService::new(store.clone(), store.clone())
                    .with_cache_invalidator(invalidator.clone()),
            ),
            profiles: Arc::new(
                ProfileService::new(store.clone(), store.clone(), identity.clone())
                    .with_cache_invalidator(invalidator),
            ),
            messages: Arc::new(MessageService::new(store.clone())),
            cache: CacheState {
                config,
                cache: cache.clone(),
            },
            health: store.clone(),
        };

        Self {
            router: build_router(state),
            store,
            cache,
            identity,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Method::GET, uri, None).await
    }
}

pub fn cache_header(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get("x-cache")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
