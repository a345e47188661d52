//! Identity lookup used by the request gate once a token's subject is known.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::auth::identity::Identity;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::repos::users::{self, User};

#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// `Ok(None)` when no user has this username.
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, DomainError>;
}

/// Looks identities up in the `users` table.
pub struct DbIdentityLookup {
    db: Arc<DatabaseConnection>,
}

impl DbIdentityLookup {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityLookup for DbIdentityLookup {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, DomainError> {
        let user = users::find_user_by_username(self.db.as_ref(), username).await?;
        Ok(user.map(Identity::from))
    }
}

/// Used when the application runs without a database: every lookup fails,
/// so bearer tokens never authenticate.
pub struct UnavailableIdentityLookup;

#[async_trait]
impl IdentityLookup for UnavailableIdentityLookup {
    async fn find_by_username(&self, _username: &str) -> Result<Option<Identity>, DomainError> {
        Err(DomainError::infra(
            InfraErrorKind::DbUnavailable,
            "identity store not configured",
        ))
    }
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            roles: user.roles,
            enabled: user.enabled,
        }
    }
}
