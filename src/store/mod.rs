//! Key-value state used by the hook: the durable reconciliation watermark
//! and the ephemeral "watched address seen" flag.
use anyhow::Context;
use async_trait::async_trait;

/// Highest slot whose orphaned tx inputs have been reconciled. Durable.
pub const LAST_TX_INPUTS_SLOT: &str = "last_tx_inputs_slot";

/// Set when a batch contained an output for the watched address. Ephemeral.
pub const UTXO_FOUND: &str = "utxo.found";

/// Minimal string key-value store.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Value stored under `key`.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Insert or overwrite `key`.
    async fn put(&self, key: &str, value: String) -> anyhow::Result<()>;

    /// Delete `key`. Missing keys are not an error.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;

    /// Current watermark, `0` when never written.
    async fn last_tx_inputs_slot(&self) -> anyhow::Result<i64> {
        match self.get(LAST_TX_INPUTS_SLOT).await? {
            Some(v) => v
                .parse::<i64>()
                .with_context(|| format!("parse {LAST_TX_INPUTS_SLOT}={v:?}")),
            None => Ok(0),
        }
    }

    /// Overwrite the watermark.
    async fn set_last_tx_inputs_slot(&self, slot: i64) -> anyhow::Result<()> {
        self.put(LAST_TX_INPUTS_SLOT, slot.to_string()).await
    }

    /// Whether the found flag is armed.
    async fn utxo_found(&self) -> anyhow::Result<bool> {
        Ok(self.get(UTXO_FOUND).await?.as_deref() == Some("true"))
    }

    /// Arm the found flag. Idempotent.
    async fn mark_utxo_found(&self) -> anyhow::Result<()> {
        self.put(UTXO_FOUND, "true".to_string()).await
    }

    /// Disarm the found flag.
    async fn clear_utxo_found(&self) -> anyhow::Result<()> {
        self.remove(UTXO_FOUND).await
    }
}

pub mod memory;
pub use memory::MemoryState;

#[cfg(feature = "store-sqlite")]
pub mod sqlite_store;
#[cfg(feature = "store-sqlite")]
pub use sqlite_store::SqliteState;
