//! Token and password primitives for the auth flows.

use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

/// Session tokens carry 16 bytes (128 bits) of OS randomness.
pub(crate) const SESSION_TOKEN_BYTES: usize = 16;

/// Create a new session token.
/// The raw value is only returned to set the cookie; the database stores a hash.
pub(crate) fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

/// Hash a session token so raw values never touch the database.
/// The hash is used for lookups when the cookie is presented.
pub(crate) fn hash_session_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

/// One-way password hash with the configured work factor.
///
/// bcrypt at the default cost takes on the order of 100ms, so it runs on the
/// blocking pool rather than an async worker.
pub(crate) async fn hash_password(password: &SecretString, cost: u32) -> Result<String> {
    let password = password.expose_secret().to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("password hashing task failed")?
        .context("failed to hash password")
}

/// Constant-time comparison of a raw password against a stored hash.
pub(crate) async fn verify_password(password: &SecretString, hash: &str) -> Result<bool> {
    let password = password.expose_secret().to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password verification task failed")?
        .context("failed to verify password")
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[test]
    fn generate_session_token_round_trip() {
        let decoded_len = generate_session_token()
            .ok()
            .and_then(|token| Base64UrlUnpadded::decode_vec(&token).ok())
            .map(|bytes| bytes.len());
        assert_eq!(decoded_len, Some(SESSION_TOKEN_BYTES));
    }

    #[test]
    fn generate_session_token_is_not_constant() {
        let first = generate_session_token().expect("token");
        let second = generate_session_token().expect("token");
        assert_ne!(first, second);
    }

    #[test]
    fn hash_session_token_stable() {
        let first = hash_session_token("token");
        let second = hash_session_token("token");
        let different = hash_session_token("other");
        assert_eq!(first, second);
        assert_ne!(first, different);
        assert_eq!(first.len(), 32);
    }

    #[tokio::test]
    async fn password_hash_verify_round_trip() {
        // Lowest cost bcrypt accepts, to keep the test fast.
        let password = SecretString::from("secret1".to_string());
        let hash = hash_password(&password, 4).await.expect("hash");

        assert!(verify_password(&password, &hash).await.expect("verify"));

        let wrong = SecretString::from("other".to_string());
        assert!(!verify_password(&wrong, &hash).await.expect("verify"));
    }

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn is_unique_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23505"),
        }));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("99999"),
        }));
        assert!(!is_unique_violation(&err));

        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
    }
}
