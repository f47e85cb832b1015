//! Signed session tokens.
//!
//! A token asserts identity only at verification time; whether the account is
//! still live is checked by re-loading the user on every request, so there is
//! no revocation list.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use starfruit_crm_core::Role;

use crate::models::User;

/// How long an issued token stays valid.
const TOKEN_TTL_DAYS: i64 = 7;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: i32,
    /// Login email at issue time.
    pub email: String,
    /// Role at issue time. Authorization still re-checks the stored role.
    pub role: Role,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// Token verification failure.
///
/// Malformed, expired, and bad-signature tokens are indistinguishable to
/// callers; the distinction never reaches a client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
}

/// Signs and verifies session tokens with a process-wide HS256 secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    /// Create a codec from the shared signing secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for a user, expiring seven days from now.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if signing fails.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.as_i32(),
            email: user.email.as_str().to_owned(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Invalid)
    }

    /// Verify a token's signature and expiry, returning its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` on any verification failure.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|_| TokenError::Invalid)?;

        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use starfruit_crm_core::{Email, UserId};

    use super::*;

    fn test_user() -> User {
        User {
            id: UserId::new(42),
            email: Email::parse("admin@dumbcrm.com").unwrap(),
            name: "Admin User".to_string(),
            role: Role::Admin,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let codec = TokenCodec::new(b"0123456789abcdef0123456789abcdef");
        let token = codec.issue(&test_user()).unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "admin@dumbcrm.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn test_verify_rejects_malformed_token() {
        let codec = TokenCodec::new(b"0123456789abcdef0123456789abcdef");
        assert_eq!(codec.verify("not-a-token"), Err(TokenError::Invalid));
        assert_eq!(codec.verify(""), Err(TokenError::Invalid));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let issuer = TokenCodec::new(b"0123456789abcdef0123456789abcdef");
        let verifier = TokenCodec::new(b"fedcba9876543210fedcba9876543210");

        let token = issuer.issue(&test_user()).unwrap();
        assert_eq!(verifier.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let codec = TokenCodec::new(b"0123456789abcdef0123456789abcdef");

        let now = Utc::now();
        let claims = Claims {
            sub: 1,
            email: "user@example.com".to_string(),
            role: Role::User,
            iat: (now - Duration::days(8)).timestamp(),
            exp: (now - Duration::days(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"0123456789abcdef0123456789abcdef"),
        )
        .unwrap();

        assert_eq!(codec.verify(&token), Err(TokenError::Invalid));
    }
}
