//! Database connection and schema management.

use crate::error::Result;
use crate::schema;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

/// Main database handle.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and verify the connection.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;
        info!(max_connections, "Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create a pool that only connects on first use.
    pub fn connect_lazy(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().connect_lazy(url)?;
        Ok(Self { pool })
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create all tables and indexes if they don't exist.
    pub async fn initialize(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for statement in schema::SCHEMA_STATEMENTS {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        info!("Database schema initialized");
        Ok(())
    }

    /// Row counts for the admin dashboard.
    pub async fn stats(&self) -> Result<DatabaseStats> {
        // Table names are compile-time constants, not user input.
        let sql = format!(
            "SELECT
                (SELECT COUNT(*) FROM {}),
                (SELECT COUNT(*) FROM {}),
                (SELECT COUNT(*) FROM {}),
                (SELECT COUNT(*) FROM {}),
                (SELECT COUNT(*) FROM {})",
            schema::TABLE_USERS,
            schema::TABLE_DISEASES,
            schema::TABLE_SYMPTOMS,
            schema::TABLE_RELATIONS,
            schema::TABLE_DIAGNOSES,
        );
        let (users, diseases, symptoms, relations, diagnoses): (i64, i64, i64, i64, i64) =
            sqlx::query_as(&sql).fetch_one(&self.pool).await?;

        Ok(DatabaseStats {
            users: users as u64,
            diseases: diseases as u64,
            symptoms: symptoms as u64,
            relations: relations as u64,
            diagnoses: diagnoses as u64,
        })
    }
}

/// Database statistics.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct DatabaseStats {
    pub users: u64,
    pub diseases: u64,
    pub symptoms: u64,
    pub relations: u64,
    pub diagnoses: u64,
}
