//! Narrows pipeline output to the single watched address.
use log::debug;
use std::sync::Arc;

use crate::store::StateStore;
use crate::types::UtxoRecord;

/// Keeps only the outputs owned by the watched address and arms the found
/// flag when any survive. Pure apart from that idempotent flag write, so the
/// host may call it from several ingestion workers at once.
pub struct AddressFilter<E> {
    address: Option<String>,
    ephemeral: Arc<E>,
}

impl<E: StateStore> AddressFilter<E> {
    /// `address` of `None` (or blank) lets nothing through.
    pub fn new(address: Option<String>, ephemeral: Arc<E>) -> Self {
        let address = address.filter(|a| !a.trim().is_empty());
        Self { address, ephemeral }
    }

    /// The watched address, if configured.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Order-preserving subsequence of `items` owned by the watched address.
    ///
    /// # Errors
    /// Only if arming the found flag fails.
    pub async fn filter_by_address(
        &self,
        items: &[UtxoRecord],
    ) -> anyhow::Result<Vec<UtxoRecord>> {
        let Some(address) = self.address.as_deref() else {
            return Ok(Vec::new());
        };

        let matched: Vec<UtxoRecord> = items
            .iter()
            .filter(|u| u.owner_addr == address)
            .cloned()
            .collect();

        if !matched.is_empty() {
            debug!("{} of {} utxos match {address}", matched.len(), items.len());
            self.ephemeral.mark_utxo_found().await?;
        }

        Ok(matched)
    }
}
