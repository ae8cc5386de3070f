//! Read-only user store lookups.
//!
//! This subsystem never mutates user records; it only reads identifiers and
//! credential digests for verification, and profiles for display.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;

/// Fields needed to verify a login attempt.
pub(super) struct UserRecord {
    pub(super) id: i64,
    pub(super) password_hash: String,
}

/// Minimal profile returned by the protected sample resource.
pub(crate) struct UserProfile {
    pub(crate) id: i64,
    pub(crate) email: String,
}

/// Look up login data by email (case-sensitive exact match).
pub(super) async fn lookup_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
    let query = "SELECT id, password_hash FROM users WHERE email = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user by email")?;

    Ok(row.map(|row| UserRecord {
        id: row.get("id"),
        password_hash: row.get("password_hash"),
    }))
}

/// Fetch the profile for an authenticated user id.
pub(crate) async fn lookup_user_profile(pool: &PgPool, user_id: i64) -> Result<Option<UserProfile>> {
    let query = "SELECT id, email FROM users WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user profile")?;

    Ok(row.map(|row| UserProfile {
        id: row.get("id"),
        email: row.get("email"),
    }))
}
