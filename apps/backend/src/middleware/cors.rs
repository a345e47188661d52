use actix_cors::Cors;
use actix_web::http::header;

use crate::config::cors::CorsConfig;

/// Build CORS middleware from configuration.
///
/// A wildcard origin list echoes the caller's origin, so credentials stay
/// allowed. Any request header is accepted.
pub fn cors_middleware(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(config.allowed_methods.iter().map(String::as_str))
        .allow_any_header()
        // Headers the browser is allowed to read from responses
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .supports_credentials()
        .max_age(config.max_age_secs);

    if config.allows_any_origin() {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
