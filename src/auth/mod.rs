pub mod token;

use astra::Request;

use crate::db::{sessions, Database};
use crate::errors::ServerError;
use token::{hash_token, hashes_equal};

pub const SESSION_COOKIE: &str = "session";

/// The single demo identity this deployment accepts.
#[derive(Debug, Clone)]
pub struct DemoCredentials {
    pub email: String,
    pub password: String,
}

/// Check a login attempt against the demo identity.
///
/// Email is compared case-insensitively; the password by hash.
pub fn authenticate(
    creds: &DemoCredentials,
    email: &str,
    password: &str,
) -> Result<String, ServerError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || password.is_empty() {
        return Err(ServerError::BadRequest(
            "Email and password are required".into(),
        ));
    }

    let email_ok = email == creds.email.trim().to_lowercase();
    let password_ok = hashes_equal(&hash_token(password), &hash_token(&creds.password));
    if email_ok && password_ok {
        Ok(email)
    } else {
        Err(ServerError::Unauthorized("Invalid email or password".into()))
    }
}

/// Raw session token from the `Cookie` header, if any.
pub fn session_token(req: &Request) -> Option<String> {
    req.headers()
        .get_all("Cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|v| !v.is_empty())
}

/// Email of the signed-in user, if the request carries a live session.
pub fn current_user(req: &Request, db: &Database, now: i64) -> Result<Option<String>, ServerError> {
    let Some(token) = session_token(req) else {
        return Ok(None);
    };
    db.with_conn(|conn| sessions::load_session_email(conn, &token, now))
}

pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

pub fn cleared_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
