//! Request failure taxonomy and its HTTP mapping.
//!
//! Every expected failure a flow can produce is one of these variants, mapped
//! to a response at the handler boundary. Unexpected failures are logged and
//! surface as a generic 500 with no internal detail in the body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// A single violated field rule. Validation responses carry every violation,
/// not just the first.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub msg: &'static str,
}

impl FieldError {
    #[must_use]
    pub const fn new(field: &'static str, msg: &'static str) -> Self {
        Self { field, msg }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("unauthorized")]
    Unauthorized,
    /// Merges "no such account" and "wrong password" so responses never leak
    /// whether an email is registered.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account already exists")]
    DuplicateAccount,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    #[must_use]
    pub fn missing_payload() -> Self {
        Self::Validation(vec![FieldError::new("body", "Missing payload")])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "errors": [{ "msg": "Authorization denied" }] })),
            )
                .into_response(),
            Self::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": [{ "msg": "Invalid credentials" }] })),
            )
                .into_response(),
            Self::DuplicateAccount => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": [{ "msg": "Account already exists" }] })),
            )
                .into_response(),
            Self::NotFound(what) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": [{ "msg": format!("{what} not found") }] })),
            )
                .into_response(),
            Self::Internal(err) => {
                error!("Internal error: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string()).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn validation_maps_to_bad_request() {
        let response = ApiError::Validation(vec![FieldError::new("name", "Name is required")])
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn credential_and_lookup_failures_map_to_400() {
        assert_eq!(
            ApiError::InvalidCredentials.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::DuplicateAccount.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("Profile").into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn internal_maps_to_500() {
        let response = ApiError::Internal(anyhow!("pool exhausted")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
