//! The authenticated principal attached to a request.

use std::collections::BTreeSet;

use actix_web::HttpMessage;
use serde::{Deserialize, Serialize};

/// Anything a token can be issued for or validated against.
pub trait Principal {
    /// Unique name carried in the `sub` claim.
    fn username(&self) -> &str;
}

impl Principal for str {
    fn username(&self) -> &str {
        self
    }
}

impl Principal for String {
    fn username(&self) -> &str {
        self.as_str()
    }
}

/// A user resolved by the identity lookup.
///
/// Once the request gate has validated a bearer token for this identity it is
/// stored in the request extensions for the rest of that request only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub roles: BTreeSet<String>,
    pub enabled: bool,
}

impl Identity {
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            roles: BTreeSet::from(["USER".to_string()]),
            enabled: true,
        }
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

impl Principal for Identity {
    fn username(&self) -> &str {
        &self.username
    }
}

/// Identity established for this request, if any.
pub fn current_identity<R: HttpMessage>(req: &R) -> Option<Identity> {
    req.extensions().get::<Identity>().cloned()
}
