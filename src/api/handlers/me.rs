//! Authenticated account lookup.

use axum::{
    Json,
    extract::Extension,
    http::HeaderMap,
    response::IntoResponse,
};
use serde::Serialize;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::{Instrument, info_span};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    api::{error::ApiError, handlers::principal::require_auth},
    token::TokenSigner,
};

/// The caller's account record. The stored credential is never included.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub created_at: String,
}

#[utoipa::path(
    get,
    path = "/auth",
    responses(
        (status = 200, description = "Return the authenticated account.", body = UserResponse),
        (status = 400, description = "Account no longer exists.", body = String),
        (status = 401, description = "Missing or invalid bearer token."),
    ),
    tag = "auth"
)]
pub async fn current_user(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    signer: Extension<Arc<TokenSigner>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &signer)?;

    // A token can outlive its account; a structurally valid claim whose
    // backing row is gone reads as not-found, not as an auth failure.
    let Some(user) = fetch_user(&pool, principal.user_id).await.map_err(|err| {
        ApiError::Internal(anyhow::Error::new(err).context("failed to fetch account"))
    })?
    else {
        return Err(ApiError::NotFound("Account"));
    };

    Ok(Json(user))
}

async fn fetch_user(pool: &PgPool, user_id: Uuid) -> Result<Option<UserResponse>, sqlx::Error> {
    let query = r#"
        SELECT
            id::text AS id,
            name,
            email,
            avatar,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM users
        WHERE id = $1
        LIMIT 1
    "#;
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.map(|row| UserResponse {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        avatar: row.get("avatar"),
        created_at: row.get("created_at"),
    }))
}
