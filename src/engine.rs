//! Wires the address filter, commit reconciler and notification gate into
//! one [`LedgerHooks`] implementation.
use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    config::{Properties, ADDRESS_FILTER},
    filter::AddressFilter,
    gate::NotificationGate,
    hooks::{CommitReport, LedgerHooks},
    ledger::QueryExecutor,
    notifier::Notifier,
    reconciler::CommitReconciler,
    store::StateStore,
    types::{CommitEvent, RollbackEvent, UtxoRecord},
};

/// Core hook. `D` = durable state, `E` = ephemeral state, `L` = ledger tables,
/// `N` = notification transport.
pub struct UtxoWatch<D, E, L, N> {
    filter: AddressFilter<E>,
    reconciler: CommitReconciler<D, L>,
    gate: NotificationGate<E, L, N>,
}

impl<D, E, L, N> UtxoWatch<D, E, L, N>
where
    D: StateStore + 'static,
    E: StateStore + 'static,
    L: QueryExecutor + 'static,
    N: Notifier + 'static,
{
    /// Build the hook watching `address` (`None` or blank filters everything out).
    pub fn new(address: Option<String>, durable: D, ephemeral: E, ledger: L, notifier: N) -> Self {
        let durable = Arc::new(durable);
        let ephemeral = Arc::new(ephemeral);
        let ledger = Arc::new(ledger);

        Self {
            filter: AddressFilter::new(address.clone(), ephemeral.clone()),
            reconciler: CommitReconciler::new(durable, ledger.clone()),
            gate: NotificationGate::new(address, ephemeral, ledger, notifier),
        }
    }

    /// Same as [`UtxoWatch::new`], reading the watched address from `address.filter`.
    pub fn from_properties(
        props: &dyn Properties,
        durable: D,
        ephemeral: E,
        ledger: L,
        notifier: N,
    ) -> Self {
        Self::new(
            props.non_empty(ADDRESS_FILTER),
            durable,
            ephemeral,
            ledger,
            notifier,
        )
    }

    /// The watched address, if any.
    pub fn address(&self) -> Option<&str> {
        self.filter.address()
    }
}

#[async_trait]
impl<D, E, L, N> LedgerHooks for UtxoWatch<D, E, L, N>
where
    D: StateStore + 'static,
    E: StateStore + 'static,
    L: QueryExecutor + 'static,
    N: Notifier + 'static,
{
    async fn filter_utxos_by_address(
        &self,
        items: &[UtxoRecord],
    ) -> anyhow::Result<Vec<UtxoRecord>> {
        self.filter.filter_by_address(items).await
    }

    /// Reconciler first, then the gate. A reconciler error aborts the
    /// callback before the gate touches the flag.
    async fn on_batch_commit(&self, event: &CommitEvent) -> anyhow::Result<CommitReport> {
        let deleted_tx_inputs = self
            .reconciler
            .on_commit(event)
            .await
            .with_context(|| format!("reconcile commit @slot {}", event.slot))?;

        let notification = self
            .gate
            .on_commit(event)
            .await
            .with_context(|| format!("notification gate @block {}", event.block))?;

        Ok(CommitReport {
            deleted_tx_inputs,
            notification,
        })
    }

    async fn on_rollback(&self, event: &RollbackEvent) -> anyhow::Result<()> {
        self.reconciler.on_rollback(event).await
    }
}
