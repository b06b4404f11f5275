//! The aggregation cycle: read the stored snapshot, score the fresh
//! exchange, merge, write back.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use philia_core::{analyze, InteractionMetrics, MetricsStore, StoreError};

/// Folds per-turn analyses into a subject's persisted rolling profile.
///
/// Holds no state of its own; everything persistent lives behind the store.
/// One read followed by one write per update, with no isolation guarantee
/// across the pair.
pub struct MetricsEngine {
    store: Arc<dyn MetricsStore>,
}

impl MetricsEngine {
    pub fn new(store: Arc<dyn MetricsStore>) -> Self {
        Self { store }
    }

    /// Score one exchange and fold it into the subject's stored metrics.
    ///
    /// A subject without a profile record fails with
    /// [`StoreError::NotFound`]; a record whose metrics are empty or
    /// malformed is treated as "no prior data" and the fresh analysis is
    /// stored verbatim. Store failures abort the whole operation (nothing
    /// partial is ever persisted) and surface to the caller after being
    /// logged.
    pub async fn update_metrics(
        &self,
        subject_id: &str,
        user_message: &str,
        bot_response: &str,
    ) -> Result<InteractionMetrics, StoreError> {
        match self.run_update(subject_id, user_message, bot_response).await {
            Ok(merged) => Ok(merged),
            Err(e) => {
                tracing::error!("Failed to update metrics for {}: {}", subject_id, e);
                Err(e)
            }
        }
    }

    async fn run_update(
        &self,
        subject_id: &str,
        user_message: &str,
        bot_response: &str,
    ) -> Result<InteractionMetrics, StoreError> {
        let raw = self.store.read_metrics(subject_id).await?;
        let prior = InteractionMetrics::from_stored(&raw);

        let fresh = analyze(user_message, bot_response);
        let merged = match prior {
            Some(prior) => prior.merged_with(&fresh),
            None => fresh,
        };

        let value = serde_json::to_value(merged)
            .context("Failed to serialize metrics snapshot")
            .map_err(StoreError::Backend)?;
        self.store
            .write_metrics(subject_id, value, Utc::now())
            .await?;

        tracing::debug!(
            "Metrics updated for {}: energy={} style={}",
            subject_id,
            merged.energy_level.as_str(),
            merged.connection_style.as_str()
        );
        Ok(merged)
    }

    /// Read the subject's current snapshot without updating it.
    ///
    /// `None` means the record exists but holds no usable metrics yet.
    pub async fn current(
        &self,
        subject_id: &str,
    ) -> Result<Option<InteractionMetrics>, StoreError> {
        let raw = self.store.read_metrics(subject_id).await?;
        Ok(InteractionMetrics::from_stored(&raw))
    }
}
