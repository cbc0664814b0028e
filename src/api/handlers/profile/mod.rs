//! Profile aggregate endpoints.
//!
//! Flow Overview:
//! 1) Authenticate via bearer token where required.
//! 2) Validate and normalize the payload.
//! 3) Read or write the aggregate and return it expanded with its owner.

pub mod entries;
pub(crate) mod storage;
pub mod types;

use axum::{
    Json,
    extract::{Extension, Path},
    http::HeaderMap,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::{
        error::{ApiError, FieldError},
        handlers::{normalize_optional, principal::require_auth},
    },
    token::TokenSigner,
};

use self::storage::ProfileDocument;
use self::types::{ProfileOwner, ProfileResponse, SocialLinks, UpsertProfileRequest};

impl From<storage::ProfileRow> for ProfileResponse {
    fn from(row: storage::ProfileRow) -> Self {
        Self {
            id: row.id.to_string(),
            user: ProfileOwner {
                id: row.user_id.to_string(),
                name: row.user_name,
                avatar: row.user_avatar,
            },
            company: row.company,
            website: row.website,
            status: row.status,
            skills: row.skills,
            bio: row.bio,
            github_username: row.github_username,
            social: row.social,
            experience: row.experience,
            education: row.education,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Split a comma-separated skills string into trimmed, non-empty entries.
pub(crate) fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

#[utoipa::path(
    post,
    path = "/profile",
    request_body = UpsertProfileRequest,
    responses(
        (status = 200, description = "Profile created or updated", body = ProfileResponse),
        (status = 400, description = "Validation failure", body = String),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    tag = "profile"
)]
pub async fn upsert_profile(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    signer: Extension<Arc<TokenSigner>>,
    payload: Option<Json<UpsertProfileRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &signer)?;

    let Some(Json(request)) = payload else {
        return Err(ApiError::missing_payload());
    };

    let status = normalize_optional(request.status);
    let skills = normalize_optional(request.skills)
        .map(|raw| split_skills(&raw))
        .unwrap_or_default();

    let mut errors = Vec::new();
    if status.is_none() {
        errors.push(FieldError::new("status", "Status is required"));
    }
    if skills.is_empty() {
        errors.push(FieldError::new("skills", "Skills is required"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let document = ProfileDocument {
        company: normalize_optional(request.company),
        website: normalize_optional(request.website),
        status: status.unwrap_or_default(),
        skills,
        bio: normalize_optional(request.bio),
        github_username: normalize_optional(request.github_username),
        social: SocialLinks {
            youtube: normalize_optional(request.youtube),
            twitter: normalize_optional(request.twitter),
            facebook: normalize_optional(request.facebook),
            linkedin: normalize_optional(request.linkedin),
            instagram: normalize_optional(request.instagram),
        },
    };

    let profile = storage::upsert(&pool, principal.user_id, &document).await?;

    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    get,
    path = "/profile/me",
    responses(
        (status = 200, description = "The caller's profile", body = ProfileResponse),
        (status = 400, description = "No profile exists for the caller", body = String),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    tag = "profile"
)]
pub async fn my_profile(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    signer: Extension<Arc<TokenSigner>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &signer)?;

    let Some(profile) = storage::fetch_by_user(&pool, principal.user_id).await? else {
        return Err(ApiError::NotFound("Profile"));
    };

    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "All profiles", body = [ProfileResponse]),
    ),
    tag = "profile"
)]
pub async fn list_profiles(pool: Extension<PgPool>) -> Result<impl IntoResponse, ApiError> {
    let profiles = storage::fetch_all(&pool).await?;

    Ok(Json(
        profiles
            .into_iter()
            .map(ProfileResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/profile/user/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user's profile", body = ProfileResponse),
        (status = 400, description = "No profile for that user, or malformed id", body = String),
    ),
    tag = "profile"
)]
pub async fn profile_by_user(
    Path(id): Path<String>,
    pool: Extension<PgPool>,
) -> Result<impl IntoResponse, ApiError> {
    // A malformed id cannot match any profile; report it the same way.
    let Ok(user_id) = Uuid::parse_str(id.trim()) else {
        return Err(ApiError::NotFound("Profile"));
    };

    let Some(profile) = storage::fetch_by_user(&pool, user_id).await? else {
        return Err(ApiError::NotFound("Profile"));
    };

    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    delete,
    path = "/profile",
    responses(
        (status = 200, description = "Profile and account removed"),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    tag = "profile"
)]
pub async fn delete_profile(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    signer: Extension<Arc<TokenSigner>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &signer)?;

    storage::delete_with_user(&pool, principal.user_id).await?;

    Ok(Json(json!({ "msg": "Account removed" })))
}
