use axum::{Json, extract::Extension, response::IntoResponse};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::{Instrument, debug, info_span};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    api::{
        error::{ApiError, FieldError},
        handlers::{normalize_email, valid_email},
    },
    password,
    token::TokenSigner,
};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation failure or invalid credentials", body = String),
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    signer: Extension<Arc<TokenSigner>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::missing_payload());
    };

    let email = normalize_email(request.email.as_deref().unwrap_or(""));
    let password = request.password.as_deref().unwrap_or("");

    let mut errors = Vec::new();
    if !valid_email(&email) {
        errors.push(FieldError::new("email", "A valid email is required"));
    }
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // Missing account and wrong password share one failure path so responses
    // never reveal whether an email is registered.
    let Some(credential) = lookup_credential(&pool, &email).await.map_err(|err| {
        ApiError::Internal(anyhow::Error::new(err).context("failed to lookup credential"))
    })?
    else {
        debug!("Login rejected: unknown account");
        return Err(ApiError::InvalidCredentials);
    };

    if !password::verify(password, &credential.password) {
        debug!("Login rejected: password mismatch");
        return Err(ApiError::InvalidCredentials);
    }

    let token = signer
        .issue(credential.user_id)
        .map_err(|err| ApiError::Internal(anyhow::anyhow!("failed to issue token: {err}")))?;

    Ok(Json(TokenResponse { token }))
}

struct CredentialRow {
    user_id: Uuid,
    password: String,
}

async fn lookup_credential(
    pool: &PgPool,
    email: &str,
) -> Result<Option<CredentialRow>, sqlx::Error> {
    let query = "SELECT id, password FROM users WHERE email = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.map(|row| CredentialRow {
        user_id: row.get("id"),
        password: row.get("password"),
    }))
}
