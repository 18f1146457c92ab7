//! Hosted identity provider seam.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity provider request failed: {0}")]
    Transport(String),
    #[error("identity provider rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Account operations delegated to the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Permanently delete the identity account.
    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError>;
}
