//! In-memory profile store: deterministic storage for tests and offline
//! runs, with one-shot write-failure injection for abort-semantics tests.

use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use philia_core::{MetricsStore, StoreError};
use serde_json::Value;
use tokio::sync::Mutex;

/// A profile row as the store sees it: the opaque metrics value plus the
/// modification timestamp of the last write.
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub metrics: Value,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Inner {
    records: HashMap<String, ProfileRecord>,
    fail_next_write: bool,
}

/// Keyed profile store held entirely in memory.
///
/// Matches the observable semantics of [`crate::SqliteProfiles`]: unknown
/// subjects are `NotFound` on both read and write, and the store never
/// creates records on its own.
#[derive(Default)]
pub struct MemoryProfiles {
    inner: Mutex<Inner>,
}

impl MemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision an empty profile row for a subject. Idempotent.
    pub async fn ensure_profile(&self, subject_id: &str) {
        let mut inner = self.inner.lock().await;
        inner
            .records
            .entry(subject_id.to_string())
            .or_insert(ProfileRecord {
                metrics: Value::Null,
                updated_at: None,
            });
    }

    /// Inspect the raw record a write produced.
    pub async fn record(&self, subject_id: &str) -> Option<ProfileRecord> {
        self.inner.lock().await.records.get(subject_id).cloned()
    }

    /// Make the next `write_metrics` call fail with a backend error.
    pub async fn fail_next_write(&self) {
        self.inner.lock().await.fail_next_write = true;
    }
}

#[async_trait]
impl MetricsStore for MemoryProfiles {
    async fn read_metrics(&self, subject_id: &str) -> Result<Value, StoreError> {
        let inner = self.inner.lock().await;
        match inner.records.get(subject_id) {
            Some(record) => Ok(record.metrics.clone()),
            None => Err(StoreError::NotFound {
                subject_id: subject_id.to_string(),
            }),
        }
    }

    async fn write_metrics(
        &self,
        subject_id: &str,
        raw: Value,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.fail_next_write {
            inner.fail_next_write = false;
            return Err(StoreError::Backend(anyhow!("injected write failure")));
        }
        match inner.records.get_mut(subject_id) {
            Some(record) => {
                record.metrics = raw;
                record.updated_at = Some(updated_at);
                Ok(())
            }
            None => Err(StoreError::NotFound {
                subject_id: subject_id.to_string(),
            }),
        }
    }
}
