//! User management: CRUD over the users table with uniqueness checks.

use std::collections::BTreeSet;

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adapters::users_sea::{UserCreate, UserUpdate};
use crate::auth::password::hash_password;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::errors::ErrorCode;
use crate::extractors::validated_json::Validate;
use crate::logging::pii::Redacted;
use crate::repos::users::{self, User};

pub const DEFAULT_ROLE: &str = "USER";
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 6;

/// User as returned over the API. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: BTreeSet<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            roles: user.roles,
        }
    }
}

/// Body of create, update and register requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub roles: Option<BTreeSet<String>>,
}

impl UserRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Supplied and non-empty; an empty password means "keep the current one" on update.
    fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    /// Supplied and non-empty; empty role sets are ignored.
    fn new_roles(&self) -> Option<&BTreeSet<String>> {
        self.roles.as_ref().filter(|r| !r.is_empty())
    }
}

impl Validate for UserRequest {
    fn validate(&self) -> Result<(), AppError> {
        let username_len = self.username.trim().chars().count();
        if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username_len) {
            return Err(AppError::invalid(
                ErrorCode::InvalidUsername,
                format!(
                    "Username must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"
                ),
            ));
        }
        if !self.email.contains('@') {
            return Err(AppError::invalid(
                ErrorCode::InvalidEmail,
                "Email should be valid",
            ));
        }
        if let Some(password) = self.new_password() {
            if password.chars().count() < PASSWORD_MIN_LEN {
                return Err(AppError::invalid(
                    ErrorCode::InvalidPassword,
                    format!("Password must be at least {PASSWORD_MIN_LEN} characters"),
                ));
            }
        }
        Ok(())
    }
}

fn username_taken() -> DomainError {
    DomainError::conflict(ConflictKind::UniqueUsername, "Username already exists")
}

fn email_taken() -> DomainError {
    DomainError::conflict(ConflictKind::UniqueEmail, "Email already exists")
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<UserDto>, AppError> {
    let users = users::list_users(conn).await?;
    Ok(users.into_iter().map(UserDto::from).collect())
}

pub async fn get_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<UserDto, AppError> {
    let user = users::find_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| DomainError::user_not_found(user_id))?;
    Ok(UserDto::from(user))
}

pub async fn get_user_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<UserDto, AppError> {
    let user = users::find_user_by_username(conn, username)
        .await?
        .ok_or_else(|| {
            AppError::not_found(
                ErrorCode::UserNotFound,
                format!("User not found with username: {username}"),
            )
        })?;
    Ok(UserDto::from(user))
}

/// Create a user. Username and email must be unused; the password is
/// required and stored as a bcrypt hash; roles default to `USER`.
pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    request: UserRequest,
) -> Result<UserDto, AppError> {
    request.validate()?;

    if users::username_exists(conn, &request.username).await? {
        return Err(username_taken().into());
    }
    if users::email_exists(conn, &request.email).await? {
        return Err(email_taken().into());
    }

    let password = request.new_password().ok_or_else(|| {
        AppError::invalid(ErrorCode::InvalidPassword, "Password is required")
    })?;
    let password_hash = hash_password(password).await?;

    let roles = request
        .new_roles()
        .cloned()
        .unwrap_or_else(|| BTreeSet::from([DEFAULT_ROLE.to_string()]));

    let dto = UserCreate::new(request.username, request.email, password_hash)
        .with_names(request.first_name, request.last_name)
        .with_roles(roles);

    let user = users::create_user(conn, dto).await?;

    info!(
        user_id = user.id,
        email = %Redacted(&user.email),
        "Created user"
    );

    Ok(UserDto::from(user))
}

/// Update a user. Uniqueness is re-checked only for values that change;
/// the password and roles are replaced only when supplied non-empty.
pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    request: UserRequest,
) -> Result<UserDto, AppError> {
    request.validate()?;

    let existing = users::find_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| DomainError::user_not_found(user_id))?;

    if existing.username != request.username
        && users::username_exists(conn, &request.username).await?
    {
        return Err(username_taken().into());
    }
    if existing.email != request.email && users::email_exists(conn, &request.email).await? {
        return Err(email_taken().into());
    }

    let mut dto = UserUpdate::new(user_id, request.username.clone(), request.email.clone())
        .with_names(request.first_name.clone(), request.last_name.clone());

    if let Some(password) = request.new_password() {
        dto = dto.with_password_hash(hash_password(password).await?);
    }
    if let Some(roles) = request.new_roles() {
        dto = dto.with_roles(roles.clone());
    }

    let user = users::update_user(conn, dto).await?;

    debug!(user_id, "Updated user");

    Ok(UserDto::from(user))
}

pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<(), AppError> {
    if users::find_user_by_id(conn, user_id).await?.is_none() {
        return Err(DomainError::user_not_found(user_id).into());
    }

    users::delete_user(conn, user_id).await?;

    info!(user_id, "Deleted user");
    Ok(())
}
