// src/db/sessions.rs
use crate::auth::token::{generate_token_default, hash_token};
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

/// Create a session for `email` and return the raw token for the cookie.
/// Only the SHA-256 of the token is stored.
pub fn create_session(
    conn: &Connection,
    email: &str,
    now: i64,
    ttl_secs: i64,
) -> Result<String, ServerError> {
    let raw_token = generate_token_default();
    let hash = hash_token(&raw_token);
    let expires_at = now + ttl_secs;

    conn.execute(
        r#"
        insert into sessions (email, token_hash, created_at, expires_at)
        values (?, ?, ?, ?)
        "#,
        params![email, hash.as_slice(), now, expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

/// Email of a live session, if the token is known, unexpired and unrevoked.
pub fn load_session_email(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<String>, ServerError> {
    let hash = hash_token(raw_token);

    conn.query_row(
        r#"
        select email
        from sessions
        where token_hash = ?
          and expires_at > ?
          and revoked_at is null
        "#,
        params![hash.as_slice(), now],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))
}

pub fn revoke_session(conn: &Connection, raw_token: &str, now: i64) -> Result<(), ServerError> {
    let hash = hash_token(raw_token);
    conn.execute(
        "update sessions set revoked_at = ? where token_hash = ? and revoked_at is null",
        params![now, hash.as_slice()],
    )
    .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;
    Ok(())
}
