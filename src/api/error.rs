//! Typed failure taxonomy for the core operations.
//!
//! Every operation hands one of these back instead of a transport code; the
//! single `IntoResponse` impl below is the only place status codes and
//! response bodies are decided.

use crate::api::handlers::auth::types::StatusResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum Error {
    /// Resource or parent resource does not exist.
    #[error("resource not found")]
    NotFound,
    /// Authenticated requester is not the author of the resource.
    #[error("requester is not the author")]
    Forbidden,
    /// No session token was supplied with the request.
    #[error("missing session token")]
    MissingToken,
    /// Token does not resolve to a live session. Expired and nonexistent
    /// sessions are indistinguishable here.
    #[error("invalid or expired session token")]
    InvalidOrExpiredToken,
    /// No account with the given username.
    #[error("unknown username")]
    UnknownUser,
    /// Password does not match the stored hash.
    #[error("wrong password")]
    InvalidCredentials,
    /// Username already registered.
    #[error("username is taken")]
    DuplicateUsername,
    /// Infrastructure fault (store, hashing); not user-correctable.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND.into_response(),
            Error::Forbidden | Error::InvalidOrExpiredToken => {
                StatusCode::UNAUTHORIZED.into_response()
            }
            Error::MissingToken => StatusCode::BAD_REQUEST.into_response(),
            // Unknown username and wrong password produce the same body so
            // usernames cannot be probed through the login endpoint.
            Error::UnknownUser | Error::InvalidCredentials => (
                StatusCode::OK,
                Json(StatusResponse::rejected("invalid username or password")),
            )
                .into_response(),
            // Registration conflicts are expected user errors, not faults.
            Error::DuplicateUsername => (
                StatusCode::OK,
                Json(StatusResponse::rejected("username is taken")),
            )
                .into_response(),
            Error::Internal(err) => {
                error!("{err:#}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            Error::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn ownership_and_token_failures_map_to_401() {
        assert_eq!(
            Error::Forbidden.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::InvalidOrExpiredToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn missing_token_maps_to_400() {
        assert_eq!(
            Error::MissingToken.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn credential_failures_are_soft_and_collapsed() {
        // Both failure causes must map to the same externally visible response.
        let unknown = Error::UnknownUser.into_response();
        let invalid = Error::InvalidCredentials.into_response();
        assert_eq!(unknown.status(), StatusCode::OK);
        assert_eq!(invalid.status(), StatusCode::OK);
    }

    #[test]
    fn duplicate_username_is_soft() {
        assert_eq!(
            Error::DuplicateUsername.into_response().status(),
            StatusCode::OK
        );
    }

    #[test]
    fn internal_maps_to_500() {
        let err = Error::Internal(anyhow!("connection reset"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
