use std::sync::Arc;

use tracing::{info, warn};

use crate::application::error::ServiceError;
use crate::application::identity::IdentityProvider;
use crate::application::repos::{FoodReviewsRepo, ProfilesRepo};
use crate::cache::{CacheInvalidator, Mutation};
use crate::domain::entities::{ProfileAccount, ProfileRecord};
use crate::domain::validation::{parse_user_id, require_text};

#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfilesRepo>,
    food_reviews: Arc<dyn FoodReviewsRepo>,
    identity: Arc<dyn IdentityProvider>,
    cache_invalidator: Option<Arc<CacheInvalidator>>,
}

impl ProfileService {
    pub fn new(
        profiles: Arc<dyn ProfilesRepo>,
        food_reviews: Arc<dyn FoodReviewsRepo>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            profiles,
            food_reviews,
            identity,
            cache_invalidator: None,
        }
    }

    pub fn with_cache_invalidator(mut self, invalidator: Arc<CacheInvalidator>) -> Self {
        self.cache_invalidator = Some(invalidator);
        self
    }

    pub fn with_cache_invalidator_opt(mut self, invalidator: Option<Arc<CacheInvalidator>>) -> Self {
        self.cache_invalidator = invalidator;
        self
    }

    pub async fn list(&self) -> Result<Vec<ProfileRecord>, ServiceError> {
        Ok(self.profiles.list_profiles().await?)
    }

    pub async fn find(&self, id: i64) -> Result<ProfileRecord, ServiceError> {
        self.profiles
            .find_profile(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("profile"))
    }

    pub async fn find_by_auth(&self, auth_id: &str) -> Result<ProfileAccount, ServiceError> {
        let auth_id = parse_user_id(auth_id)?;
        self.profiles
            .find_by_auth_id(auth_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("profile"))
    }

    /// Whether an identity account already uses `email`.
    pub async fn check_user(&self, email: Option<&str>) -> Result<bool, ServiceError> {
        let email = require_text(email, "Email")?;
        Ok(self.profiles.email_registered(&email).await?)
    }

    pub async fn create(
        &self,
        name: Option<&str>,
        auth_id: Option<&str>,
    ) -> Result<ProfileRecord, ServiceError> {
        let (Some(name), Some(auth_id)) = (
            name.map(str::trim).filter(|name| !name.is_empty()),
            auth_id.map(str::trim).filter(|id| !id.is_empty()),
        ) else {
            return Err(ServiceError::validation("Name and auth_id are required"));
        };
        let auth_id = parse_user_id(auth_id)?;

        if !self.profiles.auth_user_exists(auth_id).await? {
            return Err(ServiceError::validation(
                "Invalid auth_id: user does not exist",
            ));
        }

        let profile = self.profiles.create_profile(name, auth_id).await?;

        info!(profile_id = profile.id, "Profile created");
        if let Some(invalidator) = &self.cache_invalidator {
            invalidator.profile_created(profile.id);
        }
        Ok(profile)
    }

    /// Apply the single rename a profile is allowed.
    pub async fn rename(
        &self,
        auth_id: &str,
        name: Option<&str>,
    ) -> Result<ProfileAccount, ServiceError> {
        let auth_id = parse_user_id(auth_id)?;
        let name = require_text(name, "Name")?;

        let current = self
            .profiles
            .find_by_auth_id(auth_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("profile"))?;
        if !current.can_rename() {
            return Err(ServiceError::forbidden("You can only change your name once."));
        }

        let updated = self
            .profiles
            .rename_profile(auth_id, &name)
            .await?
            .ok_or_else(|| ServiceError::not_found("profile"))?;

        info!(profile_id = updated.id, "Profile renamed");
        if let Some(invalidator) = &self.cache_invalidator {
            invalidator.profile_updated(updated.id);
        }
        Ok(updated)
    }

    /// Remove the account: food reviews, then the profile, then the identity.
    ///
    /// Only the account owner may do this.
    pub async fn delete(&self, auth_id: &str, actor: Option<&str>) -> Result<(), ServiceError> {
        let auth_id = parse_user_id(auth_id)?;
        let actor = actor.map(parse_user_id).transpose()?;
        if actor != Some(auth_id) {
            return Err(ServiceError::forbidden(
                "Unauthorized to delete this profile",
            ));
        }

        let deleted = self.food_reviews.delete_reviews_by_user(auth_id).await?;
        let deleted_reviews = deleted.len();
        let mut mutations: Vec<Mutation> = deleted
            .into_iter()
            .map(|scope| Mutation::FoodReviewDeleted {
                review_id: scope.review_id,
                food_id: scope.food_id,
                restaurant_id: scope.restaurant_id,
            })
            .collect();

        let profile = self.profiles.delete_profile(auth_id).await?;
        if let Some(profile) = &profile {
            mutations.push(Mutation::ProfileDeleted {
                profile_id: profile.id,
            });
        }
        if let Some(invalidator) = &self.cache_invalidator {
            invalidator.apply_all(&mutations);
        }
        let Some(profile) = profile else {
            return Err(ServiceError::not_found("profile"));
        };

        info!(
            profile_id = profile.id,
            deleted_reviews, "Profile deleted, removing identity account"
        );
        if let Err(err) = self.identity.delete_user(auth_id).await {
            warn!(profile_id = profile.id, error = %err, "Identity account deletion failed");
            return Err(err.into());
        }
        Ok(())
    }
}
