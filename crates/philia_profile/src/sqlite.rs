//! SQLite-backed profile store.
//!
//! One row per subject. The metrics value is stored as a JSON text column
//! and replaced whole on every write, together with the modification
//! timestamp. Profile rows themselves are owned by the surrounding
//! application; the store only provisions them through
//! [`SqliteProfiles::ensure_profile`] and never deletes them.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use philia_core::{MetricsStore, StoreError};
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Row, Sqlite};
use std::path::Path;

#[derive(Clone)]
pub struct SqliteProfiles {
    pool: Pool<Sqlite>,
}

impl SqliteProfiles {
    pub async fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_url = format!("sqlite://{}?mode=rwc", db_path.as_ref().display());
        let pool = SqlitePoolOptions::new()
            .connect(&db_url)
            .await
            .context("Failed to connect to SQLite database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS companion_profiles (
                subject_id   TEXT PRIMARY KEY,
                metrics_json TEXT,
                updated_at   INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create companion_profiles table")?;

        Ok(())
    }

    /// Provision an empty profile row for a subject. Idempotent; an
    /// existing row (and its metrics) is left untouched.
    pub async fn ensure_profile(&self, subject_id: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO companion_profiles (subject_id) VALUES (?)")
            .bind(subject_id)
            .execute(&self.pool)
            .await
            .context("Failed to provision profile row")?;
        Ok(())
    }
}

#[async_trait]
impl MetricsStore for SqliteProfiles {
    async fn read_metrics(&self, subject_id: &str) -> Result<Value, StoreError> {
        let row = sqlx::query("SELECT metrics_json FROM companion_profiles WHERE subject_id = ?")
            .bind(subject_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to query companion_profiles")?;

        let Some(row) = row else {
            return Err(StoreError::NotFound {
                subject_id: subject_id.to_string(),
            });
        };

        let text: Option<String> = row.get("metrics_json");
        match text {
            None => Ok(Value::Null),
            Some(text) => match serde_json::from_str(&text) {
                Ok(value) => Ok(value),
                Err(e) => {
                    // Corrupt stored text reads as empty, not fatal; the
                    // next write replaces it whole.
                    tracing::warn!("Unreadable stored metrics for {}: {}", subject_id, e);
                    Ok(Value::Null)
                }
            },
        }
    }

    async fn write_metrics(
        &self,
        subject_id: &str,
        raw: Value,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let text = serde_json::to_string(&raw).context("Failed to encode metrics value")?;

        let result = sqlx::query(
            "UPDATE companion_profiles SET metrics_json = ?, updated_at = ? WHERE subject_id = ?",
        )
        .bind(&text)
        .bind(updated_at.timestamp())
        .bind(subject_id)
        .execute(&self.pool)
        .await
        .context("Failed to write metrics")?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                subject_id: subject_id.to_string(),
            });
        }

        tracing::debug!("Metrics saved for {}", subject_id);
        Ok(())
    }
}
