//! # Agora (Session-authenticated forum API)
//!
//! `agora` is a small forum backend: users register, log in, create posts,
//! and reply to posts.
//!
//! ## Authentication
//!
//! Login mints an opaque session token (16 random bytes, base64url) with a
//! fixed validity window (1 hour by default). The database stores only a
//! SHA-256 hash of the token; the raw value lives in an `HttpOnly` cookie on
//! the client. A session past `expires_at` is treated exactly like a missing
//! one: expiry is lazy, and a background sweeper trims dead rows as
//! housekeeping.
//!
//! Login failures are deliberately ambiguous: an unknown username and a wrong
//! password produce the same response, so usernames cannot be enumerated.
//!
//! ## Authorization
//!
//! Posts and replies are mutable only by their author. The existence check
//! runs before the ownership check: mutating a nonexistent resource returns
//! `404 Not Found` for everyone, while a non-author mutating an existing
//! resource gets `401 Unauthorized`. Replies are always addressed by
//! `(post_id, id)`; a reply id under the wrong post is not found.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
