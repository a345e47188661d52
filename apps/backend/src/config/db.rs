use crate::config::must_var;
use crate::error::AppError;

/// Connection string for the application database (`DATABASE_URL`).
pub fn database_url() -> Result<String, AppError> {
    let url = must_var("DATABASE_URL")?;
    if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
        return Err(AppError::config(
            "DATABASE_URL must be a postgres:// or postgresql:// URL",
        ));
    }
    Ok(url)
}
