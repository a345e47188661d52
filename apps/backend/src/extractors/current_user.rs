use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::auth::identity::{current_identity, Identity};
use crate::error::AppError;

/// The authenticated identity of the current request.
///
/// Fails with 401 `UNAUTHORIZED` when the gate attached no identity, so a
/// handler taking `CurrentUser` is protected even on a public path.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl CurrentUser {
    pub fn into_inner(self) -> Identity {
        self.0
    }
}

impl Deref for CurrentUser {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            current_identity(req)
                .map(CurrentUser)
                .ok_or_else(AppError::unauthorized),
        )
    }
}
