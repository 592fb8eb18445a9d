//! Database connection settings
//!
//! Discrete `DB_*` settings build the connection; a full URL, when given,
//! replaces all of them.

use sqlx::postgres::PgConnectOptions;

use crate::db::pool::DEFAULT_MAX_CONNECTIONS;

/// Where and how to reach PostgreSQL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,

    /// Full connection URL, overrides the discrete fields
    pub url: Option<String>,

    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            name: "app_db".to_string(),
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl DatabaseConfig {
    /// Connection options for the pool.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        if let Some(url) = &self.url {
            return url.parse();
        }

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name))
    }
}
