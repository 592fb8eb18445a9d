//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. The database may come
//! up after the server (compose stacks), so connecting retries with a
//! fixed backoff before giving up.

use std::future::Future;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Startup retry policy: bounded attempts with a fixed pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// A single attempt, no waiting.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff: Duration::from_secs(3),
        }
    }
}

/// Create a PostgreSQL connection pool, retrying per `policy`.
///
/// Each attempt opens the pool and pings it with `SELECT 1`. Returns the
/// last error once attempts are exhausted.
///
/// # Example
///
/// ```ignore
/// let options = "postgres://localhost/app_db".parse()?;
/// let pool = connect_with_retry(options, 5, RetryPolicy::default()).await?;
/// ```
pub async fn connect_with_retry(
    options: PgConnectOptions,
    max_connections: u32,
    policy: RetryPolicy,
) -> Result<PgPool, sqlx::Error> {
    let host = options.get_host().to_owned();
    let port = options.get_port();

    let pool = retry(policy, || {
        let options = options.clone();
        async move {
            let pool = PgPoolOptions::new()
                .max_connections(max_connections)
                .connect_with(options)
                .await?;
            sqlx::query("SELECT 1").execute(&pool).await?;
            Ok::<_, sqlx::Error>(pool)
        }
    })
    .await?;

    tracing::info!(%host, port, "Connected to database");
    Ok(pool)
}

/// Run `op` until it succeeds or `policy.max_attempts` is reached.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                tracing::warn!(attempt, attempts, error = %e, "Database connection attempt failed");
                tokio::time::sleep(policy.backoff).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(attempts, error = %e, "Giving up on database connection");
                return Err(e);
            }
        }
    }
}
