use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::jwt::TokenService;
use crate::auth::lookup::{DbIdentityLookup, IdentityLookup, UnavailableIdentityLookup};
use crate::config::profile::RuntimeProfile;
use crate::error::AppError;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios), shared with the
    /// identity lookup
    db: Option<Arc<DatabaseConnection>>,
    /// Token issuance and validation, keys shared across workers
    pub tokens: TokenService,
    /// Resolves a token subject to an identity
    pub identities: Arc<dyn IdentityLookup>,
    /// Active runtime profile
    pub profile: RuntimeProfile,
}

impl AppState {
    /// Create a new AppState backed by the given database connection
    pub fn new(db: DatabaseConnection, tokens: TokenService, profile: RuntimeProfile) -> Self {
        let db = Arc::new(db);
        let identities: Arc<dyn IdentityLookup> =
            Arc::new(DbIdentityLookup::new(Arc::clone(&db)));
        Self {
            db: Some(db),
            tokens,
            identities,
            profile,
        }
    }

    /// Create a new AppState without a database connection.
    ///
    /// Bearer tokens never authenticate in this mode because identity lookup
    /// always fails.
    pub fn without_db(tokens: TokenService, profile: RuntimeProfile) -> Self {
        Self {
            db: None,
            tokens,
            identities: Arc::new(UnavailableIdentityLookup),
            profile,
        }
    }

    /// Replace the identity lookup (tests use in-memory fakes).
    pub fn with_identity_lookup(mut self, identities: Arc<dyn IdentityLookup>) -> Self {
        self.identities = identities;
        self
    }

    /// Get a reference to the database connection if available
    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_deref()
    }

    /// Database connection or `DB_UNAVAILABLE` for handlers that need one
    pub fn require_db(&self) -> Result<&DatabaseConnection, AppError> {
        self.db
            .as_deref()
            .ok_or_else(|| AppError::db_unavailable("database connection not configured"))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("tokens", &self.tokens)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}
