use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod credentials;

/// Upper bound on configured token lifetime (ten years).
const MAX_EXPIRY_HOURS: u64 = 24 * 365 * 10;

/// Claims carried by every bearer token issued by [`TokenService`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user identifier.
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    Generation(String),

    #[error("malformed token")]
    Malformed,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token expired")]
    Expired,
}

/// Issues and verifies HS256 bearer tokens.
///
/// The signing secret is handed in at construction; the service holds no
/// other state, so one instance is shared by every request.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").field("expiry", &self.expiry).finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, expiry: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry,
        })
    }

    pub fn from_hours(secret: &str, expiry_hours: u64) -> Result<Self, TokenError> {
        let hours = expiry_hours.min(MAX_EXPIRY_HOURS) as i64;
        Self::new(secret, Duration::hours(hours))
    }

    /// Issue a token for `user_id` expiring after the configured duration.
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };
        self.sign(&claims)
    }

    /// Verify signature and expiry, returning the encoded user id.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::from_hours("test-secret", 1).unwrap()
    }

    #[test]
    fn issued_token_verifies_to_same_user() {
        let tokens = service();
        let user_id = Uuid::new_v4();
        let token = tokens.issue(user_id).unwrap();
        assert_eq!(tokens.verify(&token), Ok(user_id));
    }

    #[test]
    fn rejects_empty_secret() {
        assert_eq!(TokenService::from_hours("", 1).unwrap_err(), TokenError::InvalidSecret);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let other = TokenService::from_hours("another-secret", 1).unwrap();
        let token = other.issue(Uuid::new_v4()).unwrap();
        assert_eq!(service().verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn rejects_expired_token() {
        let tokens = service();
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = tokens.sign(&claims).unwrap();
        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(service().verify("not-a-jwt"), Err(TokenError::Malformed));
        assert_eq!(service().verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn negative_expiry_yields_immediately_expired_tokens() {
        let tokens = TokenService::new("test-secret", Duration::seconds(-5)).unwrap();
        let token = tokens.issue(Uuid::new_v4()).unwrap();
        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }
}
