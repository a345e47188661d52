//! Username/password login and self-registration.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use serde_json::Map;
use tracing::debug;

use crate::auth::jwt::TokenService;
use crate::auth::password::verify_password;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::validated_json::Validate;
use crate::logging::security;
use crate::repos::users;
use crate::services::users::{create_user, UserRequest};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.username.trim().is_empty() {
            return Err(AppError::invalid(
                ErrorCode::InvalidUsername,
                "Username is required",
            ));
        }
        if self.password.is_empty() {
            return Err(AppError::invalid(
                ErrorCode::InvalidPassword,
                "Password is required",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
    pub user_id: i64,
}

/// Check credentials and issue a token.
///
/// Unknown users and wrong passwords both answer `BAD_CREDENTIALS`.
pub async fn authenticate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tokens: &TokenService,
    request: &LoginRequest,
) -> Result<AuthResponse, AppError> {
    debug!(user = %request.username, "Attempting to authenticate user");

    let Some(user) = users::find_user_by_username(conn, &request.username).await? else {
        security::login_failed("unknown user", &request.username);
        return Err(AppError::bad_credentials());
    };

    if !verify_password(&request.password, &user.password_hash).await? {
        security::login_failed("wrong password", &request.username);
        return Err(AppError::bad_credentials());
    }

    if !user.enabled {
        security::login_failed("account disabled", &request.username);
        return Err(AppError::account_disabled());
    }

    let token = tokens.generate(&user.username, Map::new())?;

    security::audit("LOGIN", &user.username, "User logged in");

    Ok(AuthResponse {
        token,
        username: user.username,
        user_id: user.id,
    })
}

/// Create the account, then log in with the supplied credentials.
pub async fn register<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tokens: &TokenService,
    request: UserRequest,
) -> Result<AuthResponse, AppError> {
    let login = LoginRequest::new(
        request.username.clone(),
        request.password.clone().unwrap_or_default(),
    );

    let created = create_user(conn, request).await?;
    security::audit("REGISTER", &created.username, "User registered");

    authenticate(conn, tokens, &login).await
}
