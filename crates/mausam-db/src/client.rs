//! Database client and connection management

use crate::{DbError, DbResult};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tracing::info;

/// Database client wrapping sqlx connection pool
#[derive(Clone, Debug)]
pub struct DbClient {
    pool: MySqlPool,
}

impl DbClient {
    /// Create a new database client from connection string
    pub async fn new(database_url: &str) -> DbResult<Self> {
        if !database_url.starts_with("mysql://") {
            return Err(DbError::ConfigError(format!(
                "unsupported database url scheme: {database_url}"
            )));
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Connect and create the tables if they do not exist yet
    pub async fn connect_and_migrate(database_url: &str) -> DbResult<Self> {
        let client = Self::new(database_url).await?;
        client.ping().await?;
        crate::schema::migrate(&client.pool).await?;
        info!("Database schema ready");
        Ok(client)
    }

    /// Get reference to underlying pool for direct queries
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Test the database connection
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_non_mysql_url() {
        let err = DbClient::new("postgres://localhost/mausam").await.unwrap_err();
        assert!(matches!(err, DbError::ConfigError(_)));
    }
}
