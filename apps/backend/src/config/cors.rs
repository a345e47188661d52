use actix_web::http::Method;

use crate::config::var_or;
use crate::error::AppError;

pub const DEFAULT_ALLOWED_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";

/// Cross-origin settings read from `CORS_ALLOWED_ORIGINS` and `CORS_ALLOWED_METHODS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub max_age_secs: usize,
}

impl CorsConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::parse(
            &var_or("CORS_ALLOWED_ORIGINS", "*"),
            &var_or("CORS_ALLOWED_METHODS", DEFAULT_ALLOWED_METHODS),
        )
    }

    pub fn parse(origins: &str, methods: &str) -> Result<Self, AppError> {
        let entries: Vec<&str> = origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "null")
            .collect();

        let allowed_origins = if entries.contains(&"*") {
            Vec::new()
        } else {
            for origin in &entries {
                if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                    return Err(AppError::config(format!(
                        "CORS origin '{origin}' must start with http:// or https://"
                    )));
                }
            }
            entries.into_iter().map(str::to_string).collect()
        };

        let mut allowed_methods = Vec::new();
        for method in methods.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let upper = method.to_ascii_uppercase();
            Method::from_bytes(upper.as_bytes()).map_err(|_| {
                AppError::config(format!("CORS method '{method}' is not a valid HTTP method"))
            })?;
            allowed_methods.push(upper);
        }

        Ok(Self {
            allowed_origins,
            allowed_methods,
            max_age_secs: 3600,
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty()
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: DEFAULT_ALLOWED_METHODS
                .split(',')
                .map(str::to_string)
                .collect(),
            max_age_secs: 3600,
        }
    }
}
