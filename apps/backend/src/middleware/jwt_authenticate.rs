//! Bearer-token authentication.
//!
//! Runs once per request ahead of every handler. When the request carries a
//! valid `Authorization: Bearer <token>` header for a known user, the
//! resolved [`Identity`] is stored in the request extensions. The gate never
//! rejects a request; failures simply leave it unauthenticated and
//! [`AccessControl`](crate::middleware::access_control::AccessControl)
//! decides what that means.

use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::{debug, warn};

use crate::auth::identity::{current_identity, Identity};
use crate::auth::jwt::TokenService;
use crate::auth::lookup::IdentityLookup;
use crate::middleware::public_paths::is_public_path;
use crate::state::app_state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Where a request ended up in the authentication pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Public path; the header was not inspected.
    Exempt,
    /// No header, or not a `Bearer ` scheme.
    NoToken,
    /// Signature or payload rejected.
    DecodeFailed,
    /// An identity was already attached; left untouched.
    AlreadyAuthenticated,
    /// Subject unknown or lookup errored.
    LookupFailed,
    /// Token decoded but is expired or issued for someone else.
    Invalid,
    Authenticated(Identity),
}

/// Run the authentication pipeline for one request.
pub async fn authenticate_request(
    path: &str,
    authorization: Option<&str>,
    existing: Option<&Identity>,
    tokens: &TokenService,
    identities: &dyn IdentityLookup,
) -> GateOutcome {
    if is_public_path(path) {
        return GateOutcome::Exempt;
    }

    let Some(token) = authorization.and_then(|value| value.strip_prefix(BEARER_PREFIX)) else {
        return GateOutcome::NoToken;
    };

    let username = match tokens.extract_username(token) {
        Ok(username) => username,
        Err(e) => {
            debug!(path, error = %e, "Could not extract username from JWT");
            return GateOutcome::DecodeFailed;
        }
    };

    if existing.is_some() {
        return GateOutcome::AlreadyAuthenticated;
    }

    let identity = match identities.find_by_username(&username).await {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            debug!(path, user = %username, "JWT subject does not match a known user");
            return GateOutcome::LookupFailed;
        }
        Err(e) => {
            warn!(path, transient = e.is_transient(), error = %e, "Identity lookup failed");
            return GateOutcome::LookupFailed;
        }
    };

    if tokens.validate_token(token, &identity) {
        debug!(path, user = %identity.username, "Authenticated request");
        GateOutcome::Authenticated(identity)
    } else {
        warn!(path, user = %identity.username, "JWT token validation failed");
        GateOutcome::Invalid
    }
}

pub struct JwtAuthenticate;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthenticateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthenticateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthenticateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthenticateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match req.app_data::<web::Data<AppState>>().cloned() {
                Some(state) => {
                    let authorization = req
                        .headers()
                        .get(header::AUTHORIZATION)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_owned);
                    let existing = current_identity(&req);

                    let outcome = authenticate_request(
                        req.path(),
                        authorization.as_deref(),
                        existing.as_ref(),
                        &state.tokens,
                        state.identities.as_ref(),
                    )
                    .await;

                    if let GateOutcome::Authenticated(identity) = outcome {
                        req.extensions_mut().insert(identity);
                    }
                }
                None => warn!("AppState not available; request continues unauthenticated"),
            }

            service.call(req).await
        })
    }
}
