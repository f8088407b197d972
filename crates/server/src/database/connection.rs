use serde::{Deserialize, Serialize};
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Error as SqlxError;
use tracing::{info, warn};

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Upper bound on acquiring a connection for `/health`.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DbConfig {
    username: String,
    password: String,
    dbname: String,
    address: Option<String>,
    max_connections: Option<u32>,
}

impl DbConfig {
    const ADDRESS_FALLBACK: &'static str = "localhost";
    const MAX_CONN_FALLBACK: u32 = 5;

    #[cfg(test)]
    pub fn development(dbname: &str, username: &str, password: &str) -> Self {
        Self {
            dbname: dbname.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            address: None,
            max_connections: None,
        }
    }

    /// Connection url, `DATABASE_URL` wins over the configured fields.
    pub fn get_url(&self) -> String {
        std::env::var(DATABASE_URL_ENV).unwrap_or_else(|_| self.assemble_url())
    }

    pub fn assemble_url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}/{}",
            self.username,
            self.password,
            self.address.as_deref().unwrap_or(Self::ADDRESS_FALLBACK),
            self.dbname,
        )
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections.unwrap_or(Self::MAX_CONN_FALLBACK)
    }
}

#[derive(Clone)]
pub struct DbConnection {
    pool: PgPool,
}

impl DbConnection {
    pub async fn connect(config: &DbConfig) -> Result<Self, SqlxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections())
            .connect(&config.get_url())
            .await?;
        info!(
            "connected to database, max connections: {}",
            config.max_connections()
        );
        Ok(Self { pool })
    }

    /// Builds the pool without opening a connection; the first query connects.
    #[cfg(test)]
    pub fn connect_lazy(url: &str) -> Result<Self, SqlxError> {
        let pool = PgPoolOptions::new()
            .max_connections(DbConfig::MAX_CONN_FALLBACK)
            .connect_lazy(url)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn is_healthy(&self) -> bool {
        match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, self.pool.acquire()).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!("health check failed to acquire a connection: {e}");
                false
            }
            Err(_) => {
                warn!(
                    "health check timed out after {:?}",
                    HEALTH_CHECK_TIMEOUT
                );
                false
            }
        }
    }
}
