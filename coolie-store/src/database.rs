use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::app_config::DatabaseConfig;
use crate::error::StoreError;
use crate::schema::{MigrationReport, SchemaManager};

#[derive(Clone)]
pub struct DbClient {
    pub pool: SqlitePool,
}

impl DbClient {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Private in-memory database. Pinned to one connection that never
    /// expires, since every new SQLite memory connection is a fresh database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self, schema: &SchemaManager) -> Result<MigrationReport, StoreError> {
        info!("Checking bookings schema...");
        let report = schema.ensure(&self.pool).await?;
        if report.is_empty() {
            info!("Schema up to date.");
        } else {
            info!(
                "Schema migrated: added {:?}, backfilled {} rows.",
                report.added_columns, report.backfilled_rows
            );
        }
        Ok(report)
    }
}
