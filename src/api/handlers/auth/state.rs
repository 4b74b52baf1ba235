//! Auth configuration and shared state.

use chrono::{DateTime, Utc};
use std::sync::Arc;

const DEFAULT_SESSION_TTL_SECONDS: i64 = 60 * 60;

/// Time source for expiry decisions. Injected so the 1-hour session window is
/// testable without waiting.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    session_ttl_seconds: i64,
    cookie_secure: bool,
    bcrypt_cost: u32,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            cookie_secure: false,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    #[must_use]
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }
}

pub struct AuthState {
    config: AuthConfig,
    clock: Arc<dyn Clock>,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Clock;
    use chrono::{DateTime, Utc};

    /// Clock pinned to a fixed instant.
    pub(crate) struct FixedClock(pub DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn config_defaults() {
        let config = AuthConfig::new("http://localhost:8080".to_string());
        assert_eq!(config.session_ttl_seconds(), 3600);
        assert!(!config.session_cookie_secure());
        assert_eq!(config.bcrypt_cost(), bcrypt::DEFAULT_COST);
    }

    #[test]
    fn config_builders_override() {
        let config = AuthConfig::new("http://localhost:8080".to_string())
            .with_session_ttl_seconds(60)
            .with_cookie_secure(true)
            .with_bcrypt_cost(4);
        assert_eq!(config.session_ttl_seconds(), 60);
        assert!(config.session_cookie_secure());
        assert_eq!(config.bcrypt_cost(), 4);
    }

    #[test]
    fn state_uses_injected_clock() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let state = AuthState::new(
            AuthConfig::new("http://localhost:8080".to_string()),
            std::sync::Arc::new(test_support::FixedClock(instant)),
        );
        assert_eq!(state.now(), instant);
    }
}
