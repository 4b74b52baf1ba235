//! API handlers and shared utilities.
//!
//! Route handlers are grouped by concern: `auth` (registration, login,
//! sessions), `forum` (posts and replies), plus `health` and the root banner.

pub mod auth;
pub mod forum;
pub mod health;
pub mod root;

use regex::Regex;

/// Upper bound for post and reply bodies, in characters.
pub(crate) const MAX_TEXT_CHARS: usize = 10_000;

/// Usernames: 3-32 chars, letters, digits, `_`, `.`, `-`.
pub fn valid_username(username: &str) -> bool {
    Regex::new(r"^[A-Za-z0-9_.-]{3,32}$").is_ok_and(|re| re.is_match(username))
}

/// Post/reply text must be non-empty (after trimming) and bounded.
pub fn valid_text(text: &str) -> bool {
    !text.trim().is_empty() && text.chars().count() <= MAX_TEXT_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_username_accepts_basic_names() {
        assert!(valid_username("alice"));
        assert!(valid_username("bob_42"));
        assert!(valid_username("a.b-c"));
    }

    #[test]
    fn valid_username_rejects_bad_names() {
        assert!(!valid_username("ab"));
        assert!(!valid_username(""));
        assert!(!valid_username("has spaces"));
        assert!(!valid_username("way-too-long-to-be-a-reasonable-username"));
        assert!(!valid_username("emoji🦀"));
    }

    #[test]
    fn valid_text_bounds() {
        assert!(valid_text("hello"));
        assert!(!valid_text(""));
        assert!(!valid_text("   "));
        assert!(valid_text(&"x".repeat(MAX_TEXT_CHARS)));
        assert!(!valid_text(&"x".repeat(MAX_TEXT_CHARS + 1)));
    }
}
