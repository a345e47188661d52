//! bcrypt password hashing.
//!
//! bcrypt is CPU-bound, so both operations run on the blocking thread pool
//! and never stall an async worker.

use tokio::task;

use crate::errors::domain::{DomainError, InfraErrorKind};

/// Work factor for newly hashed passwords.
pub const HASH_COST: u32 = bcrypt::DEFAULT_COST;

fn hashing_error(detail: String) -> DomainError {
    DomainError::infra(InfraErrorKind::Other("PasswordHash".into()), detail)
}

pub async fn hash_password(raw: &str) -> Result<String, DomainError> {
    let raw = raw.to_owned();

    task::spawn_blocking(move || bcrypt::hash(raw, HASH_COST))
        .await
        .map_err(|e| hashing_error(format!("hashing task failed: {e}")))?
        .map_err(|e| hashing_error(format!("failed to hash password: {e}")))
}

/// Compare `raw` against a stored bcrypt hash. Malformed hashes never match;
/// only a failed blocking task is an error.
pub async fn verify_password(raw: &str, hash: &str) -> Result<bool, DomainError> {
    let raw = raw.to_owned();
    let hash = hash.to_owned();

    task::spawn_blocking(move || bcrypt::verify(raw, &hash).unwrap_or(false))
        .await
        .map_err(|e| hashing_error(format!("verification task failed: {e}")))
}
