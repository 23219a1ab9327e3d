//! Database repository for contribution records.
//!
//! Uses prepared statements and transactions for data integrity.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use super::ContributionStore;
use crate::errors::AppError;
use crate::models::{Contribution, CreateContributionRequest, Status};

const SELECT_COLUMNS: &str =
    "SELECT id, sequence, timestamp, username, private_channel, size, status, text FROM contributions";

/// SQLite-backed contribution store.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContributionStore for Repository {
    async fn get_contributions(&self, user_id: &str) -> Result<Vec<Contribution>, AppError> {
        let rows = sqlx::query(&format!(
            "{} WHERE username = ? ORDER BY timestamp, rowid",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(contribution_from_row).collect()
    }

    async fn delete_entry(&self, id: &str, sequence: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contributions WHERE id = ? AND sequence = ?")
            .bind(id)
            .bind(sequence)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Contribution {}-{} not found",
                id, sequence
            )));
        }

        tracing::info!(id, sequence, "Deleted contribution");
        Ok(())
    }

    async fn create_contribution(
        &self,
        request: &CreateContributionRequest,
    ) -> Result<Contribution, AppError> {
        let id = match &request.id {
            Some(id) if id.contains('-') => {
                return Err(AppError::Validation(
                    "Contribution id must not contain '-'".to_string(),
                ))
            }
            Some(id) if id.trim().is_empty() => {
                return Err(AppError::Validation("Contribution id is empty".to_string()))
            }
            Some(id) => id.clone(),
            None => uuid::Uuid::new_v4().simple().to_string(),
        };
        let status = request.status.unwrap_or(Status::Initial);
        if status.is_final() {
            return Err(AppError::Validation(format!(
                "New contributions cannot be {}",
                status
            )));
        }
        let timestamp = Utc::now().timestamp_millis();

        let mut tx = self.pool.begin().await?;

        let next: i64 = sqlx::query(
            "SELECT COALESCE(MAX(CAST(sequence AS INTEGER)), 0) + 1 AS next_sequence FROM contributions WHERE id = ?",
        )
        .bind(&id)
        .fetch_one(&mut *tx)
        .await?
        .get("next_sequence");
        let sequence = next.to_string();

        sqlx::query(
            "INSERT INTO contributions (id, sequence, timestamp, username, private_channel, size, status, text) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&sequence)
        .bind(timestamp)
        .bind(&request.username)
        .bind(&request.private_channel)
        .bind(request.size.as_str())
        .bind(status.as_str())
        .bind(&request.text)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Contribution {
            id,
            sequence,
            timestamp,
            username: request.username.clone(),
            private_channel: request.private_channel.clone(),
            size: request.size,
            status,
            text: request.text.clone(),
        })
    }

    async fn get_contribution(
        &self,
        id: &str,
        sequence: &str,
    ) -> Result<Option<Contribution>, AppError> {
        let row = sqlx::query(&format!("{} WHERE id = ? AND sequence = ?", SELECT_COLUMNS))
            .bind(id)
            .bind(sequence)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(contribution_from_row).transpose()
    }

    async fn update_status(
        &self,
        id: &str,
        sequence: &str,
        status: Status,
    ) -> Result<Contribution, AppError> {
        let result =
            sqlx::query("UPDATE contributions SET status = ? WHERE id = ? AND sequence = ?")
                .bind(status.as_str())
                .bind(id)
                .bind(sequence)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Contribution {}-{} not found",
                id, sequence
            )));
        }

        self.get_contribution(id, sequence).await?.ok_or_else(|| {
            AppError::NotFound(format!("Contribution {}-{} not found", id, sequence))
        })
    }
}

// Row conversion rejects enumeration values outside the closed sets.
fn contribution_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Contribution, AppError> {
    let size: String = row.get("size");
    let status: String = row.get("status");
    Ok(Contribution {
        id: row.get("id"),
        sequence: row.get("sequence"),
        timestamp: row.get("timestamp"),
        username: row.get("username"),
        private_channel: row.get("private_channel"),
        size: size.parse()?,
        status: status.parse()?,
        text: row.get("text"),
    })
}
