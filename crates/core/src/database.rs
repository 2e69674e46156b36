//! Single-tenant PostgreSQL connection pool.
//!
//! The pipeline runs against one database — no schema-per-tenant isolation
//! is needed, so this wraps a plain `sqlx::PgPool` plus the helpers the rest
//! of the crate expects (health checks, migrations).

use crate::{config::DatabaseConfig, error::Result};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

#[derive(Clone)]
pub struct DatabasePool {
    pub pool: PgPool,
}

impl DatabasePool {
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        info!("Initializing database pool");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        info!("Database pool initialized successfully");

        Ok(Self { pool })
    }

    pub fn get(&self) -> &PgPool {
        &self.pool
    }

    pub async fn check_health(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await.map_err(|e| {
            crate::Error::new(
                crate::ErrorCode::DatabaseMigrationError,
                format!("migration failed: {}", e),
            )
        })?;
        Ok(())
    }
}
