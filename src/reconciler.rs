//! Removes spends whose outputs were filtered away.
//!
//! `tx_input` rows are written for every spend on chain, but `address_utxo`
//! only holds the watched address. Parallel batch workers may also land a
//! spend before the output it consumes, so absence is only conclusive once a
//! later commit has arrived. Each commit therefore cleans rows past the
//! previous commit's slot, then moves the watermark to its own slot.
use anyhow::Context;
use log::{debug, info, warn};
use std::sync::Arc;

use crate::ledger::{Query, QueryExecutor};
use crate::store::StateStore;
use crate::types::{CommitEvent, RollbackEvent};

/// Owns the `last_tx_inputs_slot` watermark.
pub struct CommitReconciler<D, L> {
    durable: Arc<D>,
    ledger: Arc<L>,
}

impl<D, L> CommitReconciler<D, L>
where
    D: StateStore,
    L: QueryExecutor,
{
    /// Reconciler over a durable state store and the ledger tables.
    pub fn new(durable: Arc<D>, ledger: Arc<L>) -> Self {
        Self { durable, ledger }
    }

    /// Delete orphaned spends past the watermark, then set the watermark to
    /// `event.slot`. Returns the number of rows deleted.
    ///
    /// # Errors
    /// Storage failures are returned as-is; the watermark is not moved and
    /// the host decides whether to retry the batch.
    pub async fn on_commit(&self, event: &CommitEvent) -> anyhow::Result<u64> {
        let watermark = self.durable.last_tx_inputs_slot().await?;
        debug!("Deleting additional tx inputs after slot: {watermark}");

        let deleted = self
            .ledger
            .update(&Query::delete_orphan_tx_inputs(watermark))
            .await
            .with_context(|| format!("delete orphaned tx inputs after slot {watermark}"))?;

        if deleted > 0 {
            info!("Deleted {deleted} additional tx inputs.");
        }

        if event.slot < watermark {
            warn!(
                "commit slot {} is behind watermark {watermark}; storing it anyway",
                event.slot
            );
        }
        self.durable
            .set_last_tx_inputs_slot(event.slot)
            .await
            .context("save last_tx_inputs_slot")?;

        Ok(deleted)
    }

    /// Reset the watermark to the rollback point so re-ingested spends past
    /// it get reconciled again.
    pub async fn on_rollback(&self, event: &RollbackEvent) -> anyhow::Result<()> {
        info!("Rollback to slot {}; resetting tx input watermark", event.slot);
        self.durable
            .set_last_tx_inputs_slot(event.slot)
            .await
            .context("reset last_tx_inputs_slot")
    }
}
