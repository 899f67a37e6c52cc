//! JWT issuance and validation.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::user::User,
};

use super::revocation::RevocationRegistry;

/// Why a presented token was rejected. All variants map to an HTTP 401;
/// the distinction is kept for logging and tests.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,
    #[error("Token has expired")]
    Expired,
    #[error("Token has been revoked")]
    Revoked,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Authentication(err.to_string())
    }
}

/// JWT claims for authenticated users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's login
    pub sub: String,
    pub user_id: i64,
    /// Unique token id, the revocation key
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Mints and validates signed, time-bounded bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    ttl_seconds: i64,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>, ttl_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds: ttl_hours as i64 * 3600,
        }
    }

    /// Issue a token for an already-authenticated user. Embeds a fresh
    /// UUID-v4 `jti` and an expiry of now + TTL. No side effects.
    pub fn issue(&self, user: &User) -> AppResult<(String, Claims)> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.username.clone(),
            user_id: user.id,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, claims))
    }

    /// Validate a presented token and return its claims.
    ///
    /// Checks run in order: signature/structure, expiry, revocation. A token
    /// past its expiry reports [`TokenError::Expired`] regardless of
    /// revocation state.
    pub fn authorize(
        &self,
        token: &str,
        revocations: &RevocationRegistry,
    ) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        if revocations.is_revoked(&data.claims.jti) {
            return Err(TokenError::Revoked);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", 1)
    }

    fn user() -> User {
        User {
            id: 42,
            username: "admin".to_string(),
            password: "unused".to_string(),
        }
    }

    /// Encode claims directly, bypassing `issue`, to craft expired tokens.
    fn encode_raw(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issue_embeds_subject_and_fresh_jti() {
        let issuer = issuer();
        let (_, first) = issuer.issue(&user()).unwrap();
        let (_, second) = issuer.issue(&user()).unwrap();

        assert_eq!(first.sub, "admin");
        assert_eq!(first.user_id, 42);
        assert_eq!(first.exp, first.iat + 3600);
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn authorize_accepts_fresh_token() {
        let issuer = issuer();
        let revocations = RevocationRegistry::new();
        let (token, claims) = issuer.issue(&user()).unwrap();

        let authorized = issuer.authorize(&token, &revocations).unwrap();
        assert_eq!(authorized.user_id, 42);
        assert_eq!(authorized.jti, claims.jti);
    }

    #[test]
    fn authorize_rejects_malformed_token() {
        let issuer = issuer();
        let revocations = RevocationRegistry::new();
        assert_eq!(
            issuer.authorize("not-a-jwt", &revocations),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn authorize_rejects_wrong_signature() {
        let issuer = issuer();
        let revocations = RevocationRegistry::new();
        let (token, _) = TokenIssuer::new("other-secret", 1).issue(&user()).unwrap();
        assert_eq!(
            issuer.authorize(&token, &revocations),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn authorize_rejects_expired_token() {
        let issuer = issuer();
        let revocations = RevocationRegistry::new();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "admin".to_string(),
            user_id: 42,
            jti: "expired-jti".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode_raw(&claims, "test-secret");
        assert_eq!(
            issuer.authorize(&token, &revocations),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn authorize_rejects_revoked_token() {
        let issuer = issuer();
        let revocations = RevocationRegistry::new();
        let (token, claims) = issuer.issue(&user()).unwrap();

        revocations.revoke(&claims.jti, claims.exp);
        assert_eq!(
            issuer.authorize(&token, &revocations),
            Err(TokenError::Revoked)
        );
    }

    #[test]
    fn expiry_takes_precedence_over_revocation() {
        let issuer = issuer();
        let revocations = RevocationRegistry::new();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "admin".to_string(),
            user_id: 42,
            jti: "both-jti".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        revocations.revoke(&claims.jti, claims.exp);
        let token = encode_raw(&claims, "test-secret");
        assert_eq!(
            issuer.authorize(&token, &revocations),
            Err(TokenError::Expired)
        );
    }
}
