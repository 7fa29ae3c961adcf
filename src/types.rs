//! Records and events exchanged with the host indexing pipeline.
use serde::{Deserialize, Serialize};

/// An unspent output as produced by the pipeline, before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoRecord {
    /// Bech32 owner address.
    pub owner_addr: String,
    /// Hex transaction hash.
    pub tx_hash: String,
    /// Output index within the transaction.
    pub output_index: u32,
    /// Output value in lovelace.
    pub lovelace_amount: i64,
}

impl UtxoRecord {
    /// Convenience constructor.
    pub fn new(
        owner_addr: impl Into<String>,
        tx_hash: impl Into<String>,
        output_index: u32,
        lovelace_amount: i64,
    ) -> Self {
        Self {
            owner_addr: owner_addr.into(),
            tx_hash: tx_hash.into(),
            output_index,
            lovelace_amount,
        }
    }
}

/// A spend of `(tx_hash, output_index)`. Carries no owner address, so the
/// pipeline stores every one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInputRecord {
    /// Hash of the transaction whose output is spent.
    pub tx_hash: String,
    /// Index of the spent output.
    pub output_index: u32,
    /// Slot of the spending transaction.
    pub spent_at_slot: i64,
}

impl TxInputRecord {
    /// Convenience constructor.
    pub fn new(tx_hash: impl Into<String>, output_index: u32, spent_at_slot: i64) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            output_index,
            spent_at_slot,
        }
    }
}

/// Fired by the host once a batch has been durably written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEvent {
    /// Slot of the last block in the batch.
    pub slot: i64,
    /// Block number of the last block in the batch.
    pub block: u64,
    /// `true` once the pipeline has caught up with the chain tip.
    pub sync_mode: bool,
}

/// Fired by the host when the chain is rolled back to `slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackEvent {
    /// Slot the chain was rolled back to.
    pub slot: i64,
}
