//! Database helpers for accounts and sessions.

use anyhow::{anyhow, Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::utils::{generate_session_token, hash_session_token, is_unique_violation};

/// Outcome when attempting to create a new account.
#[derive(Debug)]
pub(super) enum AccountOutcome {
    Created { id: Uuid },
    Exists,
}

/// Minimal fields needed to check a password login.
pub(super) struct LoginRecord {
    pub(super) user_id: Uuid,
    pub(super) password_hash: String,
}

/// Minimal data returned for a valid bearer token.
pub(crate) struct SessionRecord {
    pub(crate) user_id: Uuid,
    pub(crate) email: String,
}

/// Look up login data by email.
pub(super) async fn lookup_login_record(pool: &PgPool, email: &str) -> Result<Option<LoginRecord>> {
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
        .context("failed to lookup login record")?;

    Ok(row.map(|row| LoginRecord {
        user_id: row.get("id"),
        password_hash: row.get("password_hash"),
    }))
}

/// Create an account, mapping the email unique constraint to `Exists`.
pub(super) async fn insert_account(
    pool: &PgPool,
    name: &str,
    email: &str,
    phone: &str,
    password_hash: &str,
) -> Result<AccountOutcome> {
    let query = r"
        INSERT INTO users
            (name, email, phone, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(password_hash)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(AccountOutcome::Created { id: row.get("id") }),
        Err(err) => {
            if is_unique_violation(&err) {
                return Ok(AccountOutcome::Exists);
            }
            Err(err).context("failed to insert account")
        }
    }
}

/// Create a session row and return the raw bearer token.
///
/// Only the token hash is stored. A hash collision on insert is retried a
/// few times with a fresh token.
pub(super) async fn insert_session(
    pool: &PgPool,
    user_id: Uuid,
    ttl_seconds: i64,
) -> Result<String> {
    for _ in 0..3 {
        let token = generate_session_token()?;
        let token_hash = hash_session_token(&token);

        let query = r"
            INSERT INTO user_sessions
                (user_id, session_hash, expires_at)
            VALUES ($1, $2, NOW() + ($3 * INTERVAL '1 second'))
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(user_id)
            .bind(&token_hash)
            .bind(ttl_seconds)
            .execute(pool)
            .instrument(span)
            .await;

        match result {
            Ok(_) => return Ok(token),
            Err(err) if is_unique_violation(&err) => {}
            Err(err) => return Err(err).context("failed to insert session"),
        }
    }

    Err(anyhow!("failed to create a unique session token"))
}

/// Resolve a bearer token hash to its live session, if any.
pub(crate) async fn lookup_session(
    pool: &PgPool,
    token_hash: &[u8],
) -> Result<Option<SessionRecord>> {
    let query = r"
        SELECT u.id, u.email
        FROM user_sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.session_hash = $1 AND s.expires_at > NOW()
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(token_hash)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup session")?;

    Ok(row.map(|row| SessionRecord {
        user_id: row.get("id"),
        email: row.get("email"),
    }))
}
