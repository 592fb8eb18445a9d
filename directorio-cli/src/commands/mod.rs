//! Command implementations for the directorio binary

pub mod migrate;
pub mod serve;

pub use migrate::run_migrate;
pub use serve::run_serve;

use anyhow::{Context, Result};
use clap::Args;

use directorio_server::db::{connect_with_retry, migrations, PgPool, RetryPolicy};
use directorio_server::DatabaseConfig;

/// PostgreSQL connection arguments shared by every command
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", default_value = "postgres", hide_env_values = true)]
    pub db_password: String,

    /// Database name
    #[arg(long, env = "DB_NAME", default_value = "app_db")]
    pub db_name: String,

    /// Full connection URL (overrides the DB_* settings)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pool connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5)]
    pub db_max_connections: u32,
}

impl DbArgs {
    pub fn to_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            name: self.db_name.clone(),
            url: self.database_url.clone(),
            max_connections: self.db_max_connections,
        }
    }
}

/// Connect with startup retries, then bring the schema up to date.
pub async fn prepare_database(db: &DbArgs) -> Result<PgPool> {
    let config = db.to_config();
    let options = config
        .connect_options()
        .context("Invalid database configuration")?;

    let pool = connect_with_retry(options, config.max_connections, RetryPolicy::default())
        .await
        .context("Failed to connect to database")?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}
