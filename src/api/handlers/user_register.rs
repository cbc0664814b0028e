use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{Instrument, info_span};
use utoipa::ToSchema;

use crate::{
    api::{
        error::{ApiError, FieldError},
        handlers::{PASSWORD_MIN_LENGTH, is_unique_violation, normalize_email, valid_email},
    },
    avatar, password,
};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = String),
        (status = 400, description = "Validation failure or account already exists", body = String),
    ),
    tag = "users"
)]
pub async fn register(
    pool: Extension<PgPool>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::missing_payload());
    };

    let name = request.name.as_deref().unwrap_or("").trim().to_string();
    let email = normalize_email(request.email.as_deref().unwrap_or(""));
    let password = request.password.as_deref().unwrap_or("");

    // Report every violated rule, not just the first.
    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if !valid_email(&email) {
        errors.push(FieldError::new("email", "A valid email is required"));
    }
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let avatar = avatar::gravatar_url(&email);

    let hashed = password::hash(password)
        .map_err(|err| ApiError::Internal(anyhow::anyhow!("failed to hash password: {err}")))?;

    match insert_user(&pool, &name, &email, &hashed, &avatar).await {
        Ok(()) => Ok((StatusCode::CREATED, "User registered".to_string())),
        // Email uniqueness is enforced by the store, not a racy pre-check.
        Err(err) if is_unique_violation(&err) => Err(ApiError::DuplicateAccount),
        Err(err) => Err(ApiError::Internal(
            anyhow::Error::new(err).context("failed to insert user"),
        )),
    }
}

async fn insert_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
    avatar: &str,
) -> Result<(), sqlx::Error> {
    let query = "INSERT INTO users (name, email, password, avatar) VALUES ($1, $2, $3, $4)";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(name)
        .bind(email)
        .bind(password)
        .bind(avatar)
        .execute(pool)
        .instrument(span)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};
    use sqlx::{Row, postgres::PgPoolOptions};
    use uuid::Uuid;

    const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

    async fn test_pool() -> Result<Option<PgPool>> {
        let Ok(dsn) = std::env::var("KONEKTI_TEST_DSN") else {
            eprintln!("Skipping integration test: KONEKTI_TEST_DSN not set");
            return Ok(None);
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&dsn)
            .await
            .context("failed to connect test pool")?;

        for statement in split_sql_statements(SCHEMA_SQL) {
            sqlx::query(&statement)
                .execute(&pool)
                .await
                .context("failed to apply schema statement")?;
        }

        Ok(Some(pool))
    }

    fn split_sql_statements(sql: &str) -> Vec<String> {
        let mut statements = Vec::new();
        let mut current = String::new();

        for line in sql.lines() {
            current.push_str(line);
            current.push('\n');

            if line.trim().ends_with(';') {
                let statement = current.trim();
                if !statement.is_empty() {
                    statements.push(statement.to_string());
                }
                current.clear();
            }
        }

        let leftover = current.trim();
        if !leftover.is_empty() {
            statements.push(leftover.to_string());
        }

        statements
    }

    #[tokio::test]
    async fn duplicate_email_hits_unique_constraint() -> Result<()> {
        let Some(pool) = test_pool().await? else {
            return Ok(());
        };

        let email = format!("dup-{}@example.com", Uuid::new_v4());
        let hashed = password::hash("secret-password").context("hash")?;
        let avatar = avatar::gravatar_url(&email);

        insert_user(&pool, "First", &email, &hashed, &avatar)
            .await
            .context("first insert")?;

        let second = insert_user(&pool, "Second", &email, &hashed, &avatar).await;
        let err = second.expect_err("second insert must violate the unique constraint");
        assert!(is_unique_violation(&err));

        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .context("count users")?;
        let count: i64 = row.get("count");
        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn stored_credential_is_hashed() -> Result<()> {
        let Some(pool) = test_pool().await? else {
            return Ok(());
        };

        let email = format!("hash-{}@example.com", Uuid::new_v4());
        let plaintext = "secret-password";
        let hashed = password::hash(plaintext).context("hash")?;

        insert_user(&pool, "Hashed", &email, &hashed, &avatar::gravatar_url(&email))
            .await
            .context("insert")?;

        let row = sqlx::query("SELECT password FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .context("fetch password")?;
        let stored: String = row.get("password");
        assert_ne!(stored, plaintext);
        assert!(password::verify(plaintext, &stored));

        Ok(())
    }
}
