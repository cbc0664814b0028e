//! Embedded experience and education collection endpoints.
//!
//! New entries get a fresh id and are prepended so the collections read
//! newest-first. Removal by an unknown or malformed id is a persisted no-op
//! that still returns the (unchanged) profile.

use axum::{
    Json,
    extract::{Extension, Path},
    http::HeaderMap,
    response::IntoResponse,
};
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

use super::storage;
use super::types::{
    AddEducationRequest, AddExperienceRequest, EducationEntry, ExperienceEntry, ProfileResponse,
    excise,
};

#[utoipa::path(
    put,
    path = "/profile/experience",
    request_body = AddExperienceRequest,
    responses(
        (status = 200, description = "Profile with the new experience entry", body = ProfileResponse),
        (status = 400, description = "Validation failure or no profile", body = String),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    tag = "profile"
)]
pub async fn add_experience(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    signer: Extension<Arc<TokenSigner>>,
    payload: Option<Json<AddExperienceRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &signer)?;

    let Some(Json(request)) = payload else {
        return Err(ApiError::missing_payload());
    };

    let title = normalize_optional(request.title);
    let company = normalize_optional(request.company);
    let from = normalize_optional(request.from);

    let mut errors = Vec::new();
    if title.is_none() {
        errors.push(FieldError::new("title", "Title is required"));
    }
    if company.is_none() {
        errors.push(FieldError::new("company", "Company is required"));
    }
    if from.is_none() {
        errors.push(FieldError::new("from", "From date is required"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let Some(mut profile) = storage::fetch_by_user(&pool, principal.user_id).await? else {
        return Err(ApiError::NotFound("Profile"));
    };

    let entry = ExperienceEntry {
        id: Uuid::new_v4(),
        title: title.unwrap_or_default(),
        company: company.unwrap_or_default(),
        location: normalize_optional(request.location),
        from: from.unwrap_or_default(),
        to: normalize_optional(request.to),
        current: request.current.unwrap_or(false),
        description: normalize_optional(request.description),
    };

    profile.experience.insert(0, entry);
    storage::set_experience(&pool, principal.user_id, &profile.experience).await?;

    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    delete,
    path = "/profile/experience/{id}",
    params(("id" = String, Path, description = "Experience entry id")),
    responses(
        (status = 200, description = "Profile after removal", body = ProfileResponse),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    tag = "profile"
)]
pub async fn remove_experience(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    signer: Extension<Arc<TokenSigner>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &signer)?;

    let Some(mut profile) = storage::fetch_by_user(&pool, principal.user_id).await? else {
        return Err(ApiError::NotFound("Profile"));
    };

    if let Ok(entry_id) = Uuid::parse_str(id.trim()) {
        excise(&mut profile.experience, entry_id, |entry| entry.id);
    }

    storage::set_experience(&pool, principal.user_id, &profile.experience).await?;

    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    put,
    path = "/profile/education",
    request_body = AddEducationRequest,
    responses(
        (status = 200, description = "Profile with the new education entry", body = ProfileResponse),
        (status = 400, description = "Validation failure or no profile", body = String),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    tag = "profile"
)]
pub async fn add_education(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    signer: Extension<Arc<TokenSigner>>,
    payload: Option<Json<AddEducationRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &signer)?;

    let Some(Json(request)) = payload else {
        return Err(ApiError::missing_payload());
    };

    let school = normalize_optional(request.school);
    let degree = normalize_optional(request.degree);
    let field_of_study = normalize_optional(request.field_of_study);
    let from = normalize_optional(request.from);

    let mut errors = Vec::new();
    if school.is_none() {
        errors.push(FieldError::new("school", "School is required"));
    }
    if degree.is_none() {
        errors.push(FieldError::new("degree", "Degree is required"));
    }
    if field_of_study.is_none() {
        errors.push(FieldError::new("field_of_study", "Field of study is required"));
    }
    if from.is_none() {
        errors.push(FieldError::new("from", "From date is required"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let Some(mut profile) = storage::fetch_by_user(&pool, principal.user_id).await? else {
        return Err(ApiError::NotFound("Profile"));
    };

    let entry = EducationEntry {
        id: Uuid::new_v4(),
        school: school.unwrap_or_default(),
        degree: degree.unwrap_or_default(),
        field_of_study: field_of_study.unwrap_or_default(),
        from: from.unwrap_or_default(),
        to: normalize_optional(request.to),
        current: request.current.unwrap_or(false),
        description: normalize_optional(request.description),
    };

    profile.education.insert(0, entry);
    storage::set_education(&pool, principal.user_id, &profile.education).await?;

    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    delete,
    path = "/profile/education/{id}",
    params(("id" = String, Path, description = "Education entry id")),
    responses(
        (status = 200, description = "Profile after removal", body = ProfileResponse),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    tag = "profile"
)]
pub async fn remove_education(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    signer: Extension<Arc<TokenSigner>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &signer)?;

    let Some(mut profile) = storage::fetch_by_user(&pool, principal.user_id).await? else {
        return Err(ApiError::NotFound("Profile"));
    };

    if let Ok(entry_id) = Uuid::parse_str(id.trim()) {
        excise(&mut profile.education, entry_id, |entry| entry.id);
    }

    storage::set_education(&pool, principal.user_id, &profile.education).await?;

    Ok(Json(ProfileResponse::from(profile)))
}
