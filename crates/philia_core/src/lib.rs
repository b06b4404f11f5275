//! # Philia Core
//!
//! Shared contracts for the interaction metrics engine of a conversational
//! companion:
//!
//! - [`InteractionMetrics`]: the rolling per-subject snapshot (scores,
//!   counter, classifications)
//! - [`analyze`]: pure keyword-based scoring of a single exchange
//! - [`MetricsStore`]: the narrow two-method interface to the external
//!   profile store
//!
//! The engine itself holds no state. Everything persistent lives behind
//! [`MetricsStore`], which keeps the analyzer testable in total isolation
//! from storage.

pub mod analyzer;
pub mod metrics;

pub use analyzer::analyze;
pub use metrics::{ConnectionStyle, EnergyLevel, InteractionMetrics};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Failures at the profile store boundary.
///
/// `NotFound` means the subject has no profile record at all. It is distinct
/// from "record exists but holds empty or malformed metrics", which is not an
/// error: the caller treats that as no prior data.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no profile record for subject `{subject_id}`")]
    NotFound { subject_id: String },

    #[error("profile store error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// The two operations the metrics engine requires from a profile store.
///
/// The stored value is opaque to the store: a JSON document written as a
/// whole on every update, together with the modification timestamp. No
/// atomicity is promised across a read followed by a write; concurrent
/// updates for the same subject can race and the later write wins.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Fetch the subject's current stored metrics value.
    ///
    /// Returns `Value::Null` when the record exists but holds no metrics
    /// yet, and `StoreError::NotFound` when there is no record at all.
    async fn read_metrics(&self, subject_id: &str) -> Result<Value, StoreError>;

    /// Replace the subject's stored metrics value and modification
    /// timestamp. The write is a full replace, never a field-level patch.
    async fn write_metrics(
        &self,
        subject_id: &str,
        raw: Value,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}
