#![forbid(unsafe_code)]
#![deny(missing_docs)]
//! utxo-watch: a commit hook for ledger indexers that only care about one address.
//!
//! ## What you implement
//! - [`StateStore`]: a durable store for the reconciliation watermark and an
//!   ephemeral one for the "watched address seen" flag
//!   ([`SqliteState`] / [`MemoryState`] are provided).
//! - [`QueryExecutor`]: run the two prepared ledger queries
//!   ([`SqliteLedger`] is provided).
//! - [`Notifier`]: deliver the balance message ([`WebhookNotifier`] is provided).
//!
//! ## What the hook does
//! - Narrows each batch of outputs to the watched address and arms a flag on a hit.
//! - On every commit, deletes `tx_input` rows past the previous commit's slot
//!   whose outputs were never stored, then advances the watermark.
//! - On a commit after a hit, and only once at the chain tip, posts the
//!   address' unspent balance to a webhook.
//!
//! ## Minimal usage
//! ```rust,ignore
//! use utxo_watch::prelude::*;
//!
//! async fn run() -> anyhow::Result<()> {
//!     utxo_watch::logging::init_logger();
//!     let props = EnvProperties::from_env();
//!     let hook = UtxoWatch::from_properties(
//!         &props,
//!         SqliteState::new("state.db")?,
//!         MemoryState::new(),
//!         SqliteLedger::new("ledger.db")?,
//!         WebhookNotifier::from_properties(&props)?,
//!     );
//!
//!     let kept = hook.filter_utxos_by_address(&[]).await?;
//!     assert!(kept.is_empty());
//!     hook.on_batch_commit(&CommitEvent { slot: 500, block: 123_456, sync_mode: true }).await?;
//!     Ok(())
//! }
//! ```

/// Record and event types shared with the host pipeline.
pub mod types;

/// Property lookup (`address.filter`, `discord.webhook.url`).
pub mod config;

/// Key-value state: watermark and found flag.
pub mod store;

/// Prepared ledger queries and their executor.
pub mod ledger;

/// Watched-address filter.
pub mod filter;

/// Orphaned tx-input cleanup driven by commit events.
pub mod reconciler;

/// Webhook transport.
pub mod notifier;

/// Balance notification gate.
pub mod gate;

/// Callbacks exposed to the host pipeline.
pub mod hooks;

/// Filter + reconciler + gate behind [`LedgerHooks`].
pub mod engine;

/// Logger bootstrap.
pub mod logging;

// Public re-exports
pub use config::{EnvProperties, Properties};
pub use engine::UtxoWatch;
pub use gate::GateOutcome;
pub use hooks::{CommitReport, LedgerHooks};
pub use ledger::{Query, QueryExecutor};
pub use notifier::{Notifier, NotifyError, NotifyResponse, WebhookPayload};
pub use store::{MemoryState, StateStore};
pub use types::{CommitEvent, RollbackEvent, TxInputRecord, UtxoRecord};

#[cfg(feature = "store-sqlite")]
pub use ledger::SqliteLedger;
#[cfg(feature = "store-sqlite")]
pub use store::SqliteState;
#[cfg(feature = "webhook")]
pub use notifier::WebhookNotifier;

/// Convenience prelude for end users.
pub mod prelude {
    pub use crate::{
        CommitEvent, EnvProperties, LedgerHooks, MemoryState, Notifier, Properties,
        QueryExecutor, RollbackEvent, StateStore, UtxoRecord, UtxoWatch,
    };

    #[cfg(feature = "store-sqlite")]
    pub use crate::{SqliteLedger, SqliteState};

    #[cfg(feature = "webhook")]
    pub use crate::WebhookNotifier;
}
