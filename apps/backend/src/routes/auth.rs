use actix_web::{web, HttpResponse, Result};

use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::auth::{self, LoginRequest};
use crate::services::users::UserRequest;
use crate::state::app_state::AppState;

/// Exchange username and password for a bearer token.
async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let response = auth::authenticate(db, &app_state.tokens, &body).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Create an account and log straight in.
async fn register(
    body: ValidatedJson<UserRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let response = auth::register(db, &app_state.tokens, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/register").route(web::post().to(register)));
}
