use crate::auth::jwt::TokenService;
use crate::config::profile::RuntimeProfile;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    profile: RuntimeProfile,
    database_url: Option<String>,
}

impl StateBuilder {
    /// The token secret has no fallback, so it is required up front.
    pub fn new(security_config: SecurityConfig) -> Self {
        Self {
            security_config,
            profile: RuntimeProfile::default(),
            database_url: None,
        }
    }
    pub fn with_db(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = Some(database_url.into());
        self
    }
    pub fn with_profile(mut self, profile: RuntimeProfile) -> Self {
        self.profile = profile;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        // Missing or empty secret is fatal here
        let tokens = TokenService::new(&self.security_config)
            .map_err(|e| AppError::config(e.to_string()))?;

        if let Some(url) = self.database_url {
            // single entrypoint: build + migrate
            let conn = bootstrap_db(&url).await?;
            Ok(AppState::new(conn, tokens, self.profile))
        } else {
            Ok(AppState::without_db(tokens, self.profile))
        }
    }
}

pub fn build_state(security_config: SecurityConfig) -> StateBuilder {
    StateBuilder::new(security_config)
}
