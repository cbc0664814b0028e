//! Profile persistence: aggregate reads, the single-statement upsert, and
//! embedded collection writes.

use anyhow::{Context, Result, anyhow};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::{Instrument, info_span};
use uuid::Uuid;

use super::types::{EducationEntry, ExperienceEntry, SocialLinks};

/// A profile joined with its owner's display fields.
#[derive(Debug)]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_avatar: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub status: String,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub social: SocialLinks,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub created_at: String,
    pub updated_at: String,
}

/// Sparse profile document built from an upsert payload. `None` fields are
/// left untouched when an existing profile is updated.
#[derive(Debug)]
pub(crate) struct ProfileDocument {
    pub company: Option<String>,
    pub website: Option<String>,
    pub status: String,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub social: SocialLinks,
}

const PROFILE_COLUMNS: &str = r#"
    profiles.id,
    profiles.user_id,
    users.name AS user_name,
    users.avatar AS user_avatar,
    profiles.company,
    profiles.website,
    profiles.status,
    profiles.skills,
    profiles.bio,
    profiles.github_username,
    profiles.social::text AS social,
    profiles.experience::text AS experience,
    profiles.education::text AS education,
    to_char(profiles.created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
    to_char(profiles.updated_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at
"#;

pub(crate) async fn fetch_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>> {
    let query = format!(
        r"SELECT {PROFILE_COLUMNS}
        FROM profiles
        JOIN users ON users.id = profiles.user_id
        WHERE profiles.user_id = $1
        LIMIT 1"
    );
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch profile")?;

    row.map(|row| row_to_profile(&row)).transpose()
}

pub(crate) async fn fetch_all(pool: &PgPool) -> Result<Vec<ProfileRow>> {
    let query = format!(
        r"SELECT {PROFILE_COLUMNS}
        FROM profiles
        JOIN users ON users.id = profiles.user_id
        ORDER BY profiles.created_at DESC"
    );
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let rows = sqlx::query(&query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list profiles")?;

    rows.iter().map(row_to_profile).collect()
}

/// Create or update the caller's profile in one statement.
///
/// The `user_id` unique constraint guarantees exactly one of the two branches
/// runs, and absent optional fields fall back to the stored value on update.
pub(crate) async fn upsert(
    pool: &PgPool,
    user_id: Uuid,
    document: &ProfileDocument,
) -> Result<ProfileRow> {
    let social_json =
        serde_json::to_string(&document.social).context("failed to serialize social links")?;

    let query = r"
        INSERT INTO profiles
            (user_id, company, website, status, skills, bio, github_username, social)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8::jsonb)
        ON CONFLICT (user_id) DO UPDATE SET
            company = COALESCE(EXCLUDED.company, profiles.company),
            website = COALESCE(EXCLUDED.website, profiles.website),
            status = EXCLUDED.status,
            skills = EXCLUDED.skills,
            bio = COALESCE(EXCLUDED.bio, profiles.bio),
            github_username = COALESCE(EXCLUDED.github_username, profiles.github_username),
            social = profiles.social || EXCLUDED.social,
            updated_at = NOW()
    ";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .bind(&document.company)
        .bind(&document.website)
        .bind(&document.status)
        .bind(&document.skills)
        .bind(&document.bio)
        .bind(&document.github_username)
        .bind(social_json)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to upsert profile")?;

    fetch_by_user(pool, user_id)
        .await?
        .ok_or_else(|| anyhow!("profile missing after upsert"))
}

pub(crate) async fn set_experience(
    pool: &PgPool,
    user_id: Uuid,
    entries: &[ExperienceEntry],
) -> Result<()> {
    let entries_json = serde_json::to_string(entries).context("failed to serialize experience")?;

    let query = "UPDATE profiles SET experience = $1::jsonb, updated_at = NOW() WHERE user_id = $2";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(entries_json)
        .bind(user_id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to store experience")?;

    Ok(())
}

pub(crate) async fn set_education(
    pool: &PgPool,
    user_id: Uuid,
    entries: &[EducationEntry],
) -> Result<()> {
    let entries_json = serde_json::to_string(entries).context("failed to serialize education")?;

    let query = "UPDATE profiles SET education = $1::jsonb, updated_at = NOW() WHERE user_id = $2";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(entries_json)
        .bind(user_id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to store education")?;

    Ok(())
}

/// Remove the profile and the account behind it in one transaction.
pub(crate) async fn delete_with_user(pool: &PgPool, user_id: Uuid) -> Result<()> {
    let mut tx = pool.begin().await.context("begin delete transaction")?;

    sqlx::query("DELETE FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("failed to delete profile")?;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("failed to delete user")?;

    tx.commit().await.context("commit delete transaction")?;

    Ok(())
}

fn row_to_profile(row: &PgRow) -> Result<ProfileRow> {
    let social: SocialLinks = serde_json::from_str(row.get::<String, _>("social").as_str())
        .context("invalid stored social links")?;
    let experience: Vec<ExperienceEntry> =
        serde_json::from_str(row.get::<String, _>("experience").as_str())
            .context("invalid stored experience")?;
    let education: Vec<EducationEntry> =
        serde_json::from_str(row.get::<String, _>("education").as_str())
            .context("invalid stored education")?;

    Ok(ProfileRow {
        id: row.get("id"),
        user_id: row.get("user_id"),
        user_name: row.get("user_name"),
        user_avatar: row.get("user_avatar"),
        company: row.get("company"),
        website: row.get("website"),
        status: row.get("status"),
        skills: row.get("skills"),
        bio: row.get("bio"),
        github_username: row.get("github_username"),
        social,
        experience,
        education,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
