use backend::entities::users;
use once_cell::sync::Lazy;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::json;
use time::macros::datetime;

pub const PASSWORD: &str = "secret123";

/// Minimum bcrypt cost keeps fixture hashing cheap.
const FIXTURE_HASH_COST: u32 = 4;

/// Hashed once per test binary.
pub static PASSWORD_HASH: Lazy<String> =
    Lazy::new(|| bcrypt::hash(PASSWORD, FIXTURE_HASH_COST).expect("hashing succeeds"));

pub fn user_model(id: i64, username: &str) -> users::Model {
    users::Model {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: PASSWORD_HASH.clone(),
        first_name: None,
        last_name: None,
        roles: json!(["USER"]),
        enabled: true,
        created_at: datetime!(2025-01-01 0:00 UTC),
        updated_at: datetime!(2025-01-01 0:00 UTC),
    }
}

pub fn no_users() -> Vec<users::Model> {
    Vec::new()
}

pub fn mock_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

pub fn empty_conn() -> DatabaseConnection {
    mock_db().into_connection()
}
