//! Authenticated principal extraction.
//!
//! Flow Overview: read the bearer token from the Authorization header, verify
//! it offline, and return a principal that downstream handlers can use. This
//! establishes identity only; there are no role or permission checks.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use uuid::Uuid;

use crate::{api::error::ApiError, token::TokenSigner};

/// Authenticated user context derived from the bearer token.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: Uuid,
}

/// Resolve the bearer token into a principal, or return 401 for missing or
/// invalid tokens.
///
/// # Errors
/// Returns `ApiError::Unauthorized` when the token is absent, expired, or
/// fails verification.
pub fn require_auth(headers: &HeaderMap, signer: &TokenSigner) -> Result<Principal, ApiError> {
    let Some(token) = extract_bearer_token(headers) else {
        return Err(ApiError::Unauthorized);
    };

    match signer.verify(&token) {
        Ok(user_id) => Ok(Principal { user_id }),
        Err(_) => Err(ApiError::Unauthorized),
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::DEFAULT_TOKEN_TTL_SECONDS;

    const SECRET: &str = "a-test-secret-at-least-32-bytes!";

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {token}").parse().expect("header value"),
        );
        headers
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let signer = TokenSigner::new(SECRET, DEFAULT_TOKEN_TTL_SECONDS);
        let result = require_auth(&HeaderMap::new(), &signer);
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn invalid_token_is_unauthorized() {
        let signer = TokenSigner::new(SECRET, DEFAULT_TOKEN_TTL_SECONDS);
        let result = require_auth(&bearer_headers("garbage"), &signer);
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let signer = TokenSigner::new(SECRET, -1);
        let token = signer.issue(Uuid::new_v4()).expect("issue token");
        let result = require_auth(&bearer_headers(&token), &signer);
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn valid_token_resolves_principal() {
        let signer = TokenSigner::new(SECRET, DEFAULT_TOKEN_TTL_SECONDS);
        let user_id = Uuid::new_v4();
        let token = signer.issue(user_id).expect("issue token");

        let principal = require_auth(&bearer_headers(&token), &signer).expect("principal");
        assert_eq!(principal.user_id, user_id);
    }

    #[test]
    fn bearer_extraction_handles_casing_and_blanks() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "bearer  abc ".parse().expect("header"));
        assert_eq!(extract_bearer_token(&headers), Some("abc".to_string()));

        let mut empty = HeaderMap::new();
        empty.insert(AUTHORIZATION, "Bearer ".parse().expect("header"));
        assert_eq!(extract_bearer_token(&empty), None);

        let mut basic = HeaderMap::new();
        basic.insert(AUTHORIZATION, "Basic abc".parse().expect("header"));
        assert_eq!(extract_bearer_token(&basic), None);
    }
}
