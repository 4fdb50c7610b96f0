use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::str::FromStr;

use crate::config::AuthConfig;

use super::{AuthError, Claims};

/// JSON Web Key Set as published at the issuer's well-known endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

/// A single published key. Only the RSA parameters are used here.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kty: String,
    #[serde(rename = "use")]
    pub key_use: Option<String>,
    pub kid: Option<String>,
    pub alg: Option<String>,
    pub n: Option<String>,
    pub e: Option<String>,
}

impl JwkSet {
    fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }
}

impl Jwk {
    fn decoding_key(&self) -> Result<DecodingKey, AuthError> {
        if self.kty != "RSA" {
            return Err(AuthError::UnknownKey);
        }
        let n = self.n.as_deref().ok_or(AuthError::UnknownKey)?;
        let e = self.e.as_deref().ok_or(AuthError::UnknownKey)?;
        DecodingKey::from_rsa_components(n, e).map_err(|_| AuthError::UnknownKey)
    }
}

/// Verifies inbound bearer tokens against the issuer's published key set.
///
/// The key set is fetched per verification. The issuer is expected to sit
/// behind a CDN; if fetch volume ever matters, a TTL cache in front of
/// `fetch_key_set` is the place for it.
#[derive(Clone)]
pub struct TokenVerifier {
    config: AuthConfig,
    algorithms: Vec<Algorithm>,
    client: reqwest::Client,
}

impl TokenVerifier {
    pub fn new(config: AuthConfig) -> Self {
        let mut algorithms: Vec<Algorithm> = config
            .algorithms
            .iter()
            .filter_map(|name| match Algorithm::from_str(name) {
                Ok(alg) => Some(alg),
                Err(_) => {
                    tracing::warn!("ignoring unknown signing algorithm: {}", name);
                    None
                }
            })
            .collect();

        if algorithms.is_empty() {
            algorithms.push(Algorithm::RS256);
        }

        Self {
            config,
            algorithms,
            client: reqwest::Client::new(),
        }
    }

    /// Full verification pipeline plus the scope membership check.
    /// The explicit guard call protected handlers open with.
    pub async fn require_scope(
        &self,
        headers: &HeaderMap,
        required: &str,
    ) -> Result<Claims, AuthError> {
        let claims = self.verify(headers).await?;
        claims.require_permission(required)?;
        Ok(claims)
    }

    /// Validate the Authorization header and decode the token's claims.
    pub async fn verify(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let header_value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
        let header_str = header_value
            .to_str()
            .map_err(|_| AuthError::MalformedHeader)?;
        let token = parse_bearer(header_str)?;

        // The kid in the token header selects the issuer key to verify with
        let kid = decode_header(token)
            .map_err(|_| AuthError::InvalidToken)?
            .kid
            .ok_or(AuthError::InvalidToken)?;

        let key_set = self.fetch_key_set().await?;
        let decoding_key = key_set
            .find(&kid)
            .ok_or(AuthError::UnknownKey)?
            .decoding_key()?;

        let mut validation = Validation::new(self.algorithms[0]);
        validation.algorithms = self.algorithms.clone();
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data =
            decode::<Claims>(token, &decoding_key, &validation).map_err(map_decode_error)?;

        Ok(token_data.claims)
    }

    async fn fetch_key_set(&self) -> Result<JwkSet, AuthError> {
        let url = self.config.jwks_endpoint();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AuthError::KeySet(e.to_string()))?;

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeySet(e.to_string()))
    }
}

/// Extract the raw token from an Authorization header value. The header must
/// be exactly two space-separated parts, the first being "Bearer"
/// (case-sensitive).
fn parse_bearer(value: &str) -> Result<&str, AuthError> {
    let parts: Vec<&str> = value.split(' ').collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(AuthError::MalformedHeader);
    }
    Ok(parts[1])
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => AuthError::InvalidClaims,
        _ => AuthError::InvalidToken,
    }
}
