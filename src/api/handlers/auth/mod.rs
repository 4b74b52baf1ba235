//! Registration, login, and session management.
//!
//! Login mints an opaque token with a fixed validity window and hands it to
//! the client as an `HttpOnly` cookie (a `Bearer` header is also accepted on
//! the way back in). Only a SHA-256 hash of the token is stored.
//!
//! Failed logins are deliberately ambiguous: an unknown username and a wrong
//! password are distinct internally but produce the same response body, so
//! usernames cannot be enumerated through this endpoint.

pub(crate) mod session;
mod state;
mod storage;
mod sweeper;
pub mod types;
mod utils;

pub use session::{logout, session};
pub use state::{AuthConfig, AuthState, Clock, SystemClock};
pub(crate) use sweeper::spawn_session_sweeper;

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error};

use crate::api::error::Error;

use self::types::{Credentials, StatusResponse};
use super::valid_username;

/// Freshly minted session, before the adapter decides how to deliver it.
pub(crate) struct NewSession {
    pub(crate) user_id: i64,
    pub(crate) token: String,
    pub(crate) expires_at: DateTime<Utc>,
}

#[utoipa::path(
    post,
    path= "/register",
    request_body = Credentials,
    responses (
        (status = 200, description = "Registration accepted or rejected, see the status flag", body = StatusResponse),
        (status = 400, description = "Malformed payload"),
    ),
    tag= "auth"
)]
pub async fn register(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<Credentials>>,
) -> impl IntoResponse {
    let Some(Json(credentials)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let username = credentials.username.trim().to_string();
    if !valid_username(&username) {
        return (StatusCode::BAD_REQUEST, "Invalid username".to_string()).into_response();
    }
    if credentials.password.is_empty() {
        return (StatusCode::BAD_REQUEST, "Invalid password".to_string()).into_response();
    }
    let password = SecretString::from(credentials.password);

    match create_account(&pool, &auth_state, &username, &password).await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusResponse::accepted("registration successful")),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path= "/login",
    request_body = Credentials,
    responses (
        (status = 200, description = "Login accepted (session cookie set) or rejected, see the status flag", body = StatusResponse),
        (status = 400, description = "Malformed payload"),
    ),
    tag= "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<Credentials>>,
) -> impl IntoResponse {
    let Some(Json(credentials)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let username = credentials.username.trim().to_string();
    if username.is_empty() || credentials.password.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing credentials".to_string()).into_response();
    }
    let password = SecretString::from(credentials.password);

    match open_session(&pool, &auth_state, &username, &password).await {
        Ok(new_session) => {
            debug!(
                user_id = new_session.user_id,
                expires_at = %new_session.expires_at,
                "session minted"
            );

            let mut headers = HeaderMap::new();
            match session::session_cookie(auth_state.config(), &new_session.token) {
                Ok(cookie) => {
                    headers.insert(SET_COOKIE, cookie);
                }
                Err(err) => {
                    error!("Failed to build session cookie: {err}");
                    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                }
            }

            (
                StatusCode::OK,
                headers,
                Json(StatusResponse::accepted("login successful")),
            )
                .into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// Hash the password and attempt the atomic account insert.
///
/// A duplicate username is an expected, recoverable outcome, not a fault.
pub(crate) async fn create_account(
    pool: &PgPool,
    auth_state: &AuthState,
    username: &str,
    password: &SecretString,
) -> Result<(), Error> {
    let password_hash = utils::hash_password(password, auth_state.config().bcrypt_cost()).await?;

    match storage::insert_user(pool, username, &password_hash).await? {
        storage::RegisterOutcome::Created => Ok(()),
        storage::RegisterOutcome::Conflict => Err(Error::DuplicateUsername),
    }
}

/// Check credentials and mint a session expiring `session_ttl_seconds` from
/// now.
pub(crate) async fn open_session(
    pool: &PgPool,
    auth_state: &AuthState,
    username: &str,
    password: &SecretString,
) -> Result<NewSession, Error> {
    let Some(user) = storage::lookup_user(pool, username).await? else {
        return Err(Error::UnknownUser);
    };

    if !utils::verify_password(password, &user.password_hash).await? {
        return Err(Error::InvalidCredentials);
    }

    let expires_at = auth_state.now()
        + chrono::Duration::seconds(auth_state.config().session_ttl_seconds());
    let token = storage::insert_session(pool, user.id, expires_at).await?;

    Ok(NewSession {
        user_id: user.id,
        token,
        expires_at,
    })
}
