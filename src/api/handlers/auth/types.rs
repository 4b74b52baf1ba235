//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Username/password pair, shared by registration and login.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Soft outcome envelope used by the auth endpoints.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct StatusResponse {
    pub status: bool,
    pub message: String,
}

impl StatusResponse {
    #[must_use]
    pub fn accepted(message: &str) -> Self {
        Self {
            status: true,
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn rejected(message: &str) -> Self {
        Self {
            status: false,
            message: message.to_string(),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub user_id: i64,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_response_flags() {
        let ok = StatusResponse::accepted("registration successful");
        assert!(ok.status);
        assert_eq!(ok.message, "registration successful");

        let no = StatusResponse::rejected("username is taken");
        assert!(!no.status);
    }

    #[test]
    fn credentials_deserialize() {
        let creds: Credentials =
            serde_json::from_str(r#"{"username":"alice","password":"secret1"}"#).expect("json");
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "secret1");
    }
}
