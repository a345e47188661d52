//! Startup configuration read from environment variables.

pub mod app;
pub mod cors;
pub mod db;
pub mod profile;

pub use app::AppConfig;
pub use cors::CorsConfig;
pub use profile::{Environment, RuntimeProfile};

use std::env;

use crate::error::AppError;

/// Get required environment variable or return error
pub(crate) fn must_var(name: &str) -> Result<String, AppError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::config(format!(
            "Required environment variable '{name}' is not set"
        ))),
    }
}

/// Optional environment variable; empty values count as unset.
pub(crate) fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
