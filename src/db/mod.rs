//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for contribution records.

mod repository;

pub use repository::*;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::errors::AppError;
use crate::models::{Contribution, CreateContributionRequest, Status};

/// Contribution storage used by the command responder and the admin API.
#[async_trait]
pub trait ContributionStore: Send + Sync {
    /// All contributions reported by `user_id`, oldest first.
    async fn get_contributions(&self, user_id: &str) -> Result<Vec<Contribution>, AppError>;

    /// Permanently remove one contribution. Fails with `NotFound` if absent.
    async fn delete_entry(&self, id: &str, sequence: &str) -> Result<(), AppError>;

    async fn create_contribution(
        &self,
        request: &CreateContributionRequest,
    ) -> Result<Contribution, AppError>;

    async fn get_contribution(
        &self,
        id: &str,
        sequence: &str,
    ) -> Result<Option<Contribution>, AppError>;

    async fn update_status(
        &self,
        id: &str,
        sequence: &str,
        status: Status,
    ) -> Result<Contribution, AppError>;
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contributions (
            id TEXT NOT NULL,
            sequence TEXT NOT NULL,
            timestamp INTEGER NOT NULL,
            username TEXT NOT NULL,
            private_channel TEXT NOT NULL,
            size TEXT NOT NULL,
            status TEXT NOT NULL,
            text TEXT NOT NULL,
            PRIMARY KEY (id, sequence)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_contributions_username ON contributions(username, timestamp);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
