pub mod verifier;

pub use verifier::TokenVerifier;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims decoded from a verified bearer token. Lives for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: String,
    pub exp: i64,
    /// Scope strings granted by the issuer, e.g. "post:drinks". Absent when
    /// the token was issued without an RBAC grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    /// Check membership of a required scope string.
    ///
    /// Distinguishes "claim missing entirely" (the issuer never attached
    /// permissions, a 401-class problem) from "claim present but scope not
    /// granted" (403).
    pub fn require_permission(&self, required: &str) -> Result<(), AuthError> {
        let permissions = self
            .permissions
            .as_ref()
            .ok_or(AuthError::PermissionsMissing)?;

        if permissions.iter().any(|p| p == required) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// Authorization failures, in the order the verifier can hit them.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingToken,

    #[error("Authorization header must be a Bearer token.")]
    MalformedHeader,

    #[error("Unable to parse authentication token.")]
    InvalidToken,

    #[error("Unable to find the appropriate key.")]
    UnknownKey,

    #[error("Token expired.")]
    TokenExpired,

    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,

    #[error("Permissions not included in JWT.")]
    PermissionsMissing,

    #[error("Permission not found.")]
    Forbidden,

    /// The issuer's key set could not be fetched or parsed. Not a token
    /// problem; surfaces as a 500 at the route layer.
    #[error("key set unavailable: {0}")]
    KeySet(String),
}

impl AuthError {
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Forbidden => 403,
            AuthError::KeySet(_) => 500,
            _ => 401,
        }
    }
}
