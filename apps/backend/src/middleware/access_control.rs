//! Per-path authorization applied after the authentication gate.
//!
//! Development profiles permit everything. Otherwise only the paths in
//! [`PERMITTED_PATHS`](crate::middleware::public_paths::PERMITTED_PATHS) are
//! open and every other request must carry an [`Identity`] or receives a 401
//! Problem Details response.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::auth::identity::Identity;
use crate::config::profile::RuntimeProfile;
use crate::error::AppError;
use crate::middleware::public_paths::is_permitted_path;
use crate::state::app_state::AppState;

/// Whether a request may reach its handler.
pub fn is_permitted(profile: &RuntimeProfile, path: &str, authenticated: bool) -> bool {
    profile.is_development() || is_permitted_path(path) || authenticated
}

pub struct AccessControl;

impl<S, B> Transform<S, ServiceRequest> for AccessControl
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessControlMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessControlMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AccessControlMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AccessControlMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // No state means no profile; fall back to the strictest one
            let profile = req
                .app_data::<web::Data<AppState>>()
                .map(|state| state.profile.clone())
                .unwrap_or_default();
            let authenticated = req.extensions().contains::<Identity>();

            if is_permitted(&profile, req.path(), authenticated) {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            debug!(path = %req.path(), "Rejecting unauthenticated request");
            let response = AppError::unauthorized().error_response();
            Ok(req.into_response(response).map_into_right_body())
        })
    }
}
