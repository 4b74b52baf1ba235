//! Database helpers for accounts and sessions.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::Instrument;

use super::utils::{generate_session_token, hash_session_token, is_unique_violation};

/// Outcome when attempting to create a new account.
#[derive(Debug)]
pub(super) enum RegisterOutcome {
    Created,
    Conflict,
}

/// Minimal fields needed to check a login attempt.
pub(super) struct UserRecord {
    pub(super) id: i64,
    pub(super) password_hash: String,
}

/// Row behind a presented session token. Expiry is evaluated by the caller
/// against the injected clock, not here.
pub(crate) struct SessionRecord {
    pub(crate) user_id: i64,
    pub(crate) username: String,
    pub(crate) expires_at: DateTime<Utc>,
}

/// Atomic insert of a new account; the unique index on `username` resolves
/// registration races.
pub(super) async fn insert_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<RegisterOutcome> {
    let query = "INSERT INTO users (username, password_hash) VALUES ($1, $2)";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .instrument(span)
        .await;

    match result {
        Ok(_) => Ok(RegisterOutcome::Created),
        Err(err) if is_unique_violation(&err) => Ok(RegisterOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert user"),
    }
}

/// Look up login data by username.
pub(super) async fn lookup_user(pool: &PgPool, username: &str) -> Result<Option<UserRecord>> {
    let query = "SELECT id, password_hash FROM users WHERE username = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user")?;

    Ok(row.map(|row| UserRecord {
        id: row.get("id"),
        password_hash: row.get("password_hash"),
    }))
}

/// Mint and persist a session, returning the raw token for the cookie.
/// Retries on the (cosmically unlikely) token-hash collision.
pub(super) async fn insert_session(
    pool: &PgPool,
    user_id: i64,
    expires_at: DateTime<Utc>,
) -> Result<String> {
    let query = "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );

    for _ in 0..3 {
        let token = generate_session_token()?;
        let token_hash = hash_session_token(&token);
        let result = sqlx::query(query)
            .bind(&token_hash)
            .bind(user_id)
            .bind(expires_at)
            .execute(pool)
            .instrument(span.clone())
            .await;

        match result {
            Ok(_) => return Ok(token),
            Err(err) if is_unique_violation(&err) => {}
            Err(err) => return Err(err).context("failed to insert session"),
        }
    }

    Err(anyhow!("failed to generate unique session token"))
}

/// Resolve a token hash to its session row, joined with the account name.
pub(crate) async fn lookup_session(
    pool: &PgPool,
    token_hash: &[u8],
) -> Result<Option<SessionRecord>> {
    let query = r"
        SELECT sessions.user_id, sessions.expires_at, users.username
        FROM sessions
        JOIN users ON users.id = sessions.user_id
        WHERE sessions.token_hash = $1
        LIMIT 1
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
        user_id: row.get("user_id"),
        username: row.get("username"),
        expires_at: row.get("expires_at"),
    }))
}

/// Logout is idempotent; it's fine if no rows are deleted.
pub(super) async fn delete_session(pool: &PgPool, token_hash: &[u8]) -> Result<()> {
    let query = "DELETE FROM sessions WHERE token_hash = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(token_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete session")?;
    Ok(())
}

/// Remove sessions past their expiry. Housekeeping only; expired rows are
/// already treated as absent by lookups.
pub(crate) async fn purge_expired_sessions(pool: &PgPool, now: DateTime<Utc>) -> Result<u64> {
    let query = "DELETE FROM sessions WHERE expires_at <= $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(now)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to purge expired sessions")?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::{RegisterOutcome, SessionRecord, UserRecord};
    use chrono::{TimeZone, Utc};

    #[test]
    fn register_outcome_debug_names() {
        assert_eq!(format!("{:?}", RegisterOutcome::Created), "Created");
        assert_eq!(format!("{:?}", RegisterOutcome::Conflict), "Conflict");
    }

    #[test]
    fn records_hold_values() {
        let user = UserRecord {
            id: 7,
            password_hash: "$2b$12$hash".to_string(),
        };
        assert_eq!(user.id, 7);
        assert_eq!(user.password_hash, "$2b$12$hash");

        let expires_at = Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap();
        let session = SessionRecord {
            user_id: 7,
            username: "alice".to_string(),
            expires_at,
        };
        assert_eq!(session.user_id, 7);
        assert_eq!(session.username, "alice");
        assert_eq!(session.expires_at, expires_at);
    }
}
