use actix_web::{web, HttpResponse, Result};
use sea_orm::TransactionTrait;

use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::services::users::{self, UserRequest};
use crate::state::app_state::AppState;

async fn list_users(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let users = users::list_users(db).await?;
    Ok(HttpResponse::Ok().json(users))
}

async fn get_user(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let user = users::get_user(db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// The user behind the bearer token.
async fn me(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let user = users::get_user_by_username(db, &current_user.username).await?;
    Ok(HttpResponse::Ok().json(user))
}

async fn create_user(
    body: ValidatedJson<UserRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let txn = db.begin().await?;
    let user = users::create_user(&txn, body.into_inner()).await?;
    txn.commit().await?;
    Ok(HttpResponse::Created().json(user))
}

async fn update_user(
    path: web::Path<i64>,
    body: ValidatedJson<UserRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let txn = db.begin().await?;
    let user = users::update_user(&txn, path.into_inner(), body.into_inner()).await?;
    txn.commit().await?;
    Ok(HttpResponse::Ok().json(user))
}

async fn delete_user(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let txn = db.begin().await?;
    users::delete_user(&txn, path.into_inner()).await?;
    txn.commit().await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // `/me` must be registered before `/{id}`
    cfg.service(web::resource("/me").route(web::get().to(me)))
        .service(
            web::resource("")
                .route(web::get().to(list_users))
                .route(web::post().to(create_user)),
        )
        .service(
            web::resource("/{id}")
                .route(web::get().to(get_user))
                .route(web::put().to(update_user))
                .route(web::delete().to(delete_user)),
        );
}
