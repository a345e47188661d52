use std::time::Duration;

use crate::auth::jwt::MIN_TOKEN_TTL;
use crate::config::cors::CorsConfig;
use crate::config::db::database_url;
use crate::config::profile::RuntimeProfile;
use crate::config::{must_var, var_or};
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Everything the server needs from the environment, validated once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub security: SecurityConfig,
    pub profile: RuntimeProfile,
    pub cors: CorsConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = var_or("BACKEND_HOST", "0.0.0.0");
        let port = var_or("BACKEND_PORT", "8080")
            .parse::<u16>()
            .map_err(|_| AppError::config("BACKEND_PORT must be a valid port number"))?;

        Ok(Self {
            host,
            port,
            database_url: database_url()?,
            security: security_from_env()?,
            profile: RuntimeProfile::from_env(),
            cors: CorsConfig::from_env()?,
        })
    }
}

/// `APP_JWT_SECRET` and `APP_JWT_EXPIRATION_MS`, both required.
///
/// The expiration must cover at least one whole second because token
/// timestamps are stored in seconds.
pub fn security_from_env() -> Result<SecurityConfig, AppError> {
    let secret = must_var("APP_JWT_SECRET")?;
    let min_ms = MIN_TOKEN_TTL.as_millis() as u64;
    let expiration_ms = must_var("APP_JWT_EXPIRATION_MS")?
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|ms| *ms >= min_ms)
        .ok_or_else(|| {
            AppError::config(format!(
                "APP_JWT_EXPIRATION_MS must be an integer of at least {min_ms}"
            ))
        })?;

    Ok(SecurityConfig::new(
        secret.into_bytes(),
        Duration::from_millis(expiration_ms),
    ))
}
