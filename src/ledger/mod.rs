//! Relational access to the two ledger tables the hook touches:
//! `address_utxo` (filtered outputs) and `tx_input` (all spends).
use async_trait::async_trait;

pub mod query;
pub use query::{Param, Query};

#[cfg(feature = "store-sqlite")]
pub mod sqlite_ledger;
#[cfg(feature = "store-sqlite")]
pub use sqlite_ledger::SqliteLedger;

/// Executes prepared [`Query`] values.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a data-modifying statement, returning the affected row count.
    async fn update(&self, query: &Query) -> anyhow::Result<u64>;

    /// Run a single-row, single-column query. `None` for SQL NULL or no row.
    async fn query_i64(&self, query: &Query) -> anyhow::Result<Option<i64>>;
}
