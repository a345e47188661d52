//! User repository functions for domain layer (generic over ConnectionTrait).

use std::collections::BTreeSet;

use sea_orm::ConnectionTrait;

use crate::adapters::users_sea as users_adapter;
use crate::adapters::users_sea::{UserCreate, UserUpdate};
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::infra::db_errors::map_db_err;

/// User domain model
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: BTreeSet<String>,
    pub enabled: bool,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<User>, DomainError> {
    users_adapter::list_users(conn)
        .await
        .map_err(map_db_err)?
        .into_iter()
        .map(User::try_from)
        .collect()
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_id(conn, user_id)
        .await
        .map_err(map_db_err)?;
    user.map(User::try_from).transpose()
}

pub async fn find_user_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_username(conn, username)
        .await
        .map_err(map_db_err)?;
    user.map(User::try_from).transpose()
}

pub async fn username_exists<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<bool, DomainError> {
    let user = users_adapter::find_user_by_username(conn, username)
        .await
        .map_err(map_db_err)?;
    Ok(user.is_some())
}

pub async fn email_exists<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<bool, DomainError> {
    let user = users_adapter::find_user_by_email(conn, email)
        .await
        .map_err(map_db_err)?;
    Ok(user.is_some())
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<User, DomainError> {
    let user = users_adapter::create_user(conn, dto)
        .await
        .map_err(map_db_err)?;
    User::try_from(user)
}

pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserUpdate,
) -> Result<User, DomainError> {
    let user = users_adapter::update_user(conn, dto)
        .await
        .map_err(map_db_err)?;
    User::try_from(user)
}

/// Returns `true` if a row was removed.
pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<bool, DomainError> {
    let removed = users_adapter::delete_user(conn, user_id)
        .await
        .map_err(map_db_err)?;
    Ok(removed > 0)
}

// Conversions between SeaORM models and domain models

impl TryFrom<crate::entities::users::Model> for User {
    type Error = DomainError;

    fn try_from(model: crate::entities::users::Model) -> Result<Self, Self::Error> {
        let roles: BTreeSet<String> = serde_json::from_value(model.roles).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("users.roles for id {} is not a string array: {e}", model.id),
            )
        })?;

        Ok(Self {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            first_name: model.first_name,
            last_name: model.last_name,
            roles,
            enabled: model.enabled,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
