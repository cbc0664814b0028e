//! Bearer token issuance and verification.
//!
//! Tokens are HS256 signed JWTs carrying the user id as subject. There is no
//! revocation list; expiry is the only invalidation mechanism.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use thiserror::Error;
use uuid::Uuid;

/// Default token lifetime: 100 hours.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 360_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id the token asserts.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("failed to sign token")]
    Signing,
}

/// Signs and verifies bearer tokens under a shared server secret.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry must be exact so a fixed TTL means what it says.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    /// Issue a signed token asserting `user_id`.
    ///
    /// # Errors
    /// Returns `TokenError::Signing` if claim serialization or signing fails.
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = now_unix_seconds();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_seconds),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Signing)
    }

    /// Verify signature and expiry, returning the asserted user id.
    ///
    /// # Errors
    /// Returns `TokenError::Expired` for expired tokens and
    /// `TokenError::Invalid` for anything else (bad signature, malformed
    /// token, subject that is not a user id).
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Invalid)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

/// Unix seconds for claim timestamps.
fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "a-test-secret-at-least-32-bytes!";

    #[test]
    fn issue_then_verify_roundtrip() -> Result<(), TokenError> {
        let signer = TokenSigner::new(SECRET, DEFAULT_TOKEN_TTL_SECONDS);
        let user_id = Uuid::new_v4();

        let token = signer.issue(user_id)?;
        let verified = signer.verify(&token)?;

        assert_eq!(verified, user_id);
        Ok(())
    }

    #[test]
    fn expired_token_rejected() -> Result<(), TokenError> {
        // Negative TTL places the expiry in the past at issuance time.
        let signer = TokenSigner::new(SECRET, -1);
        let token = signer.issue(Uuid::new_v4())?;

        assert_eq!(signer.verify(&token), Err(TokenError::Expired));
        Ok(())
    }

    #[test]
    fn tampered_token_rejected() -> Result<(), TokenError> {
        let signer = TokenSigner::new(SECRET, DEFAULT_TOKEN_TTL_SECONDS);
        let mut token = signer.issue(Uuid::new_v4())?;
        token.push('x');

        assert_eq!(signer.verify(&token), Err(TokenError::Invalid));
        Ok(())
    }

    #[test]
    fn wrong_secret_rejected() -> Result<(), TokenError> {
        let signer = TokenSigner::new(SECRET, DEFAULT_TOKEN_TTL_SECONDS);
        let other = TokenSigner::new("another-secret-entirely-32-bytes", DEFAULT_TOKEN_TTL_SECONDS);

        let token = signer.issue(Uuid::new_v4())?;

        assert_eq!(other.verify(&token), Err(TokenError::Invalid));
        Ok(())
    }

    #[test]
    fn non_uuid_subject_rejected() {
        let signer = TokenSigner::new(SECRET, DEFAULT_TOKEN_TTL_SECONDS);
        let now = now_unix_seconds();
        let claims = Claims {
            sub: "not-a-user-id".to_string(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encode test token");

        assert_eq!(signer.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn garbage_token_rejected() {
        let signer = TokenSigner::new(SECRET, DEFAULT_TOKEN_TTL_SECONDS);
        assert_eq!(signer.verify("not.a.token"), Err(TokenError::Invalid));
        assert_eq!(signer.verify(""), Err(TokenError::Invalid));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let signer = TokenSigner::new(SECRET, DEFAULT_TOKEN_TTL_SECONDS);
        let rendered = format!("{signer:?}");
        assert!(!rendered.contains(SECRET));
    }
}
