use actix_web::web;

pub mod auth;
pub mod environment;
pub mod health;
pub mod users;

/// Register every route. Middleware is applied by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Actuator routes: /actuator/health
    cfg.service(web::scope("/actuator").configure(health::configure_routes));

    // Auth routes: /api/v1/auth/**
    cfg.service(web::scope("/api/v1/auth").configure(auth::configure_routes));

    // User routes: /api/v1/users/**
    cfg.service(web::scope("/api/v1/users").configure(users::configure_routes));

    // Environment info: /api/v1/environment
    cfg.service(web::scope("/api/v1/environment").configure(environment::configure_routes));
}
