//! Issuance and verification of HS256 access tokens.
//!
//! A single [`TokenService`] is built at startup from [`SecurityConfig`] and
//! shared by every worker; its keys are never mutated afterwards.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error};

use crate::auth::identity::Principal;
use crate::state::security_config::SecurityConfig;

/// Claim names owned by the token service; extra claims may not override them.
const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

/// Tokens are always HS256 over the shared secret.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// `iat`/`exp` are whole seconds, so shorter lifetimes could yield a token
/// that is already expired when issued.
pub const MIN_TOKEN_TTL: Duration = Duration::from_secs(1);

/// Claims carried by every access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Username of the authenticated user
    pub sub: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Caller-supplied claims, serialized next to the registered ones
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Secret unusable at startup or signing failed
    #[error("token signing failed: {0}")]
    Signing(String),
    /// Signature invalid or token malformed
    #[error("token decoding failed: {0}")]
    Decode(#[from] jsonwebtoken::errors::Error),
}

struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

#[derive(Clone)]
pub struct TokenService {
    keys: Arc<TokenKeys>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &ALGORITHM)
            .field("ttl", &self.keys.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Build the service from configuration.
    ///
    /// Fails with [`TokenError::Signing`] when the secret is empty or the
    /// token lifetime is below [`MIN_TOKEN_TTL`]; callers treat this as fatal
    /// at startup.
    pub fn new(security: &SecurityConfig) -> Result<Self, TokenError> {
        if security.jwt_secret.is_empty() {
            return Err(TokenError::Signing("JWT secret must not be empty".to_string()));
        }
        if security.token_ttl < MIN_TOKEN_TTL {
            return Err(TokenError::Signing(format!(
                "JWT expiration must be at least {} ms",
                MIN_TOKEN_TTL.as_millis()
            )));
        }

        debug!(
            algorithm = ?ALGORITHM,
            ttl_ms = security.token_ttl.as_millis() as u64,
            "JWT keys initialized"
        );

        Ok(Self {
            keys: Arc::new(TokenKeys {
                encoding: EncodingKey::from_secret(&security.jwt_secret),
                decoding: DecodingKey::from_secret(&security.jwt_secret),
                ttl: security.token_ttl,
            }),
        })
    }

    /// Configured token lifetime.
    pub fn ttl(&self) -> Duration {
        self.keys.ttl
    }

    /// Issue a token for `principal` valid from now for the configured lifetime.
    pub fn generate<P>(
        &self,
        principal: &P,
        extra_claims: Map<String, Value>,
    ) -> Result<String, TokenError>
    where
        P: Principal + ?Sized,
    {
        self.generate_at(principal, extra_claims, SystemTime::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn generate_at<P>(
        &self,
        principal: &P,
        mut extra_claims: Map<String, Value>,
        now: SystemTime,
    ) -> Result<String, TokenError>
    where
        P: Principal + ?Sized,
    {
        let username = principal.username();
        debug!(user = username, "Generating JWT token");

        let now_ms = millis_since_epoch(now).map_err(|e| {
            error!(user = username, error = %e, "Error generating JWT token");
            e
        })?;
        let expires_ms = now_ms.saturating_add(self.keys.ttl.as_millis() as i64);

        for reserved in RESERVED_CLAIMS {
            extra_claims.remove(reserved);
        }

        let claims = Claims {
            sub: username.to_string(),
            iat: now_ms / 1000,
            exp: expires_ms / 1000,
            extra: extra_claims,
        };

        encode(&Header::new(ALGORITHM), &claims, &self.keys.encoding)
        .map_err(|e| {
            error!(user = username, error = %e, "Error generating JWT token");
            TokenError::Signing(format!("Failed to generate JWT token: {e}"))
        })
    }

    /// True only if the signature verifies, the subject is `principal` and the
    /// token has not expired. Never fails: any decode problem yields `false`.
    pub fn validate_token<P>(&self, token: &str, principal: &P) -> bool
    where
        P: Principal + ?Sized,
    {
        self.validate_token_at(token, principal, SystemTime::now())
    }

    /// [`validate_token`](Self::validate_token) evaluated at `now`.
    pub fn validate_token_at<P>(&self, token: &str, principal: &P, now: SystemTime) -> bool
    where
        P: Principal + ?Sized,
    {
        let claims = match self.extract_all_claims(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(user = principal.username(), error = %e, "Error validating JWT token");
                return false;
            }
        };

        let Ok(now_ms) = millis_since_epoch(now) else {
            return false;
        };

        let subject_matches = claims.sub == principal.username();
        let not_expired = claims.exp.saturating_mul(1000) > now_ms;
        debug!(
            user = principal.username(),
            subject_matches, not_expired, "JWT token validation result"
        );

        subject_matches && not_expired
    }

    /// Subject of a correctly signed token. Expiry is not checked here.
    pub fn extract_username(&self, token: &str) -> Result<String, TokenError> {
        self.extract_claim(token, |claims| claims.sub.clone())
    }

    /// Expiry of a correctly signed token, seconds since epoch.
    pub fn extract_expiration(&self, token: &str) -> Result<i64, TokenError> {
        self.extract_claim(token, |claims| claims.exp)
    }

    /// Project an arbitrary value out of the verified claim set.
    pub fn extract_claim<T, F>(&self, token: &str, selector: F) -> Result<T, TokenError>
    where
        F: FnOnce(&Claims) -> T,
    {
        let claims = self.extract_all_claims(token)?;
        Ok(selector(&claims))
    }

    fn extract_all_claims(&self, token: &str) -> Result<Claims, TokenError> {
        // Expiry is decided by validate_token alone so that "bad token" and
        // "expired token" stay distinguishable to callers.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        // Registered claims other than sub/iat/exp pass through as extras
        validation.validate_aud = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.required_spec_claims = ["sub", "exp"]
            .iter()
            .map(|claim| claim.to_string())
            .collect();

        decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }
}

fn millis_since_epoch(now: SystemTime) -> Result<i64, TokenError> {
    now.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .map_err(|_| TokenError::Signing("System clock is before the UNIX epoch".to_string()))
}
