//! Supabase admin API client for identity account removal.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::identity::{IdentityError, IdentityProvider};
use crate::config::IdentitySettings;

pub struct SupabaseIdentityProvider {
    client: Client,
    base_url: String,
    service_role_key: String,
}

impl SupabaseIdentityProvider {
    pub fn new(base_url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            service_role_key: service_role_key.into(),
        }
    }

    fn headers(&self) -> Result<HeaderMap, IdentityError> {
        let key = HeaderValue::from_str(&self.service_role_key)
            .map_err(|err| IdentityError::Transport(format!("invalid service role key: {err}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_role_key))
            .map_err(|err| IdentityError::Transport(format!("invalid service role key: {err}")))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError> {
        let url = format!("{}/auth/v1/admin/users/{user_id}", self.base_url);
        debug!(target = "polybites::identity", %user_id, "Deleting identity account");

        let response = self
            .client
            .delete(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|err| IdentityError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(IdentityError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// Used when no identity provider is configured; account removal is skipped.
pub struct DisabledIdentityProvider;

#[async_trait]
impl IdentityProvider for DisabledIdentityProvider {
    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError> {
        warn!(
            target = "polybites::identity",
            %user_id,
            "Identity provider not configured; account left in place"
        );
        Ok(())
    }
}

/// Pick the provider for the configured settings.
pub fn identity_provider(settings: &IdentitySettings) -> Arc<dyn IdentityProvider> {
    match (&settings.supabase_url, &settings.service_role_key) {
        (Some(url), Some(key)) => Arc::new(SupabaseIdentityProvider::new(url.clone(), key.clone())),
        _ => Arc::new(DisabledIdentityProvider),
    }
}
