use crate::api::{self, handlers::auth::AuthConfig};
use anyhow::{bail, Context, Result};
use std::time::Duration;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub frontend_url: String,
    pub session_ttl_seconds: i64,
    pub sweep_interval_seconds: u64,
    pub cookie_secure: bool,
}

/// Execute the server action.
///
/// # Errors
/// Returns an error if the DSN is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let dsn = Url::parse(&args.dsn).context("Invalid database DSN")?;

    if !matches!(dsn.scheme(), "postgres" | "postgresql") {
        bail!("Database DSN must be a postgres:// URL, got: {}", dsn);
    }

    let auth_config = AuthConfig::new(args.frontend_url)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_cookie_secure(args.cookie_secure);

    api::new(
        args.port,
        dsn.to_string(),
        auth_config,
        Duration::from_secs(args.sweep_interval_seconds),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn execute_rejects_non_postgres_dsn() {
        let args = Args {
            port: 8443,
            dsn: "mysql://user@localhost/agora".to_string(),
            frontend_url: "http://localhost:8080".to_string(),
            session_ttl_seconds: 3600,
            sweep_interval_seconds: 300,
            cookie_secure: false,
        };

        let err = execute(args).await.expect_err("scheme should be rejected");
        assert!(err.to_string().contains("postgres"));
    }

    #[tokio::test]
    async fn execute_rejects_unparsable_dsn() {
        let args = Args {
            port: 8443,
            dsn: "not a url".to_string(),
            frontend_url: "http://localhost:8080".to_string(),
            session_ttl_seconds: 3600,
            sweep_interval_seconds: 300,
            cookie_secure: false,
        };

        assert!(execute(args).await.is_err());
    }
}
