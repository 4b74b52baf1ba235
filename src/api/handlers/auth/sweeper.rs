//! Expired-session housekeeping.
//!
//! Lookups already treat sessions past `expires_at` as absent, so nothing
//! depends on this worker; it only keeps the `sessions` table from growing
//! without bound.

use chrono::Utc;
use sqlx::PgPool;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

use super::storage;

pub(crate) fn spawn_session_sweeper(
    pool: PgPool,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    let interval = if interval.is_zero() {
        Duration::from_secs(60)
    } else {
        interval
    };

    tokio::spawn(async move {
        loop {
            sleep(interval).await;

            match storage::purge_expired_sessions(&pool, Utc::now()).await {
                Ok(0) => {}
                Ok(purged) => info!(purged, "removed expired sessions"),
                Err(err) => error!("session sweep failed: {err}"),
            }
        }
    })
}
