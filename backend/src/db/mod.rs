//! PostgreSQL pool, migrations and the readiness ping

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Connections kept open even when idle
const MIN_CONNECTIONS: u32 = 2;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
const IDLE_TIMEOUT: Duration = Duration::from_secs(10 * 60);
const MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);

fn pool_options(max_connections: u32) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(MIN_CONNECTIONS.min(max_connections))
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .test_before_acquire(true)
}

/// Connect a pool using the `database` config section
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.url)
        .context("invalid database url")?
        .application_name("fittrack");

    let pool = pool_options(config.max_connections)
        .connect_with(connect_options)
        .await?;

    info!(
        max_connections = config.max_connections,
        "Database pool created"
    );
    Ok(pool)
}

/// Apply pending migrations from `backend/migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// `SELECT 1` against the pool
pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ()).map_err(|e| {
        warn!(error = %e, "Database ping failed");
        e.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_connections_never_exceed_max() {
        let options = pool_options(1);
        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 1);

        let options = pool_options(10);
        assert_eq!(options.get_min_connections(), MIN_CONNECTIONS);
    }
}
