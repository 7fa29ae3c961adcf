//! Host glue: the callbacks an indexing pipeline invokes on this crate.
use async_trait::async_trait;

use crate::gate::GateOutcome;
use crate::types::{CommitEvent, RollbackEvent, UtxoRecord};

/// Result of one [`LedgerHooks::on_batch_commit`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    /// Orphaned `tx_input` rows removed.
    pub deleted_tx_inputs: u64,
    /// What the notification gate did.
    pub notification: GateOutcome,
}

#[async_trait]
/// Lifecycle callbacks registered with the indexing pipeline.
///
/// `filter_utxos_by_address` may run concurrently from parallel ingestion
/// workers. `on_batch_commit` and `on_rollback` must be delivered one at a
/// time, in slot order.
pub trait LedgerHooks: Send + Sync {
    /// Called before persisting a batch of outputs; returns the ones to keep.
    async fn filter_utxos_by_address(
        &self,
        items: &[UtxoRecord],
    ) -> anyhow::Result<Vec<UtxoRecord>>;

    /// Called once a batch is durably committed.
    async fn on_batch_commit(&self, event: &CommitEvent) -> anyhow::Result<CommitReport>;

    /// Called when the chain is rolled back.
    async fn on_rollback(&self, event: &RollbackEvent) -> anyhow::Result<()>;
}
