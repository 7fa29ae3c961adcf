//! Edge-triggered balance notification.
//!
//! Idle --match--> Armed --commit--> Idle (+ notify when synced).
use anyhow::Context;
use log::{info, warn};
use std::sync::Arc;

use crate::ledger::{Query, QueryExecutor};
use crate::notifier::{NotifyResponse, Notifier, WebhookPayload};
use crate::store::StateStore;
use crate::types::CommitEvent;

/// What a commit did to the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Flag was not armed.
    Idle,
    /// Flag consumed while catching up; signal dropped.
    NotSynced,
    /// Flag consumed but no watched address is configured.
    NoAddress,
    /// Notification delivered.
    Sent {
        /// Balance that was reported.
        balance: i64,
        /// Transport answer.
        response: NotifyResponse,
    },
    /// Notification attempted and failed; not retried.
    Failed {
        /// Balance that would have been reported.
        balance: i64,
        /// Transport error text.
        error: String,
    },
}

/// Consumes the found flag once per commit and reports the watched
/// address' unspent balance when the pipeline is at the tip.
pub struct NotificationGate<E, L, N> {
    address: Option<String>,
    ephemeral: Arc<E>,
    ledger: Arc<L>,
    notifier: N,
}

impl<E, L, N> NotificationGate<E, L, N>
where
    E: StateStore,
    L: QueryExecutor,
    N: Notifier,
{
    /// Gate for `address` (blank means unset).
    pub fn new(address: Option<String>, ephemeral: Arc<E>, ledger: Arc<L>, notifier: N) -> Self {
        let address = address.filter(|a| !a.trim().is_empty());
        Self {
            address,
            ephemeral,
            ledger,
            notifier,
        }
    }

    /// Handle one commit.
    ///
    /// The flag is cleared before the sync check, so a match seen during
    /// catch-up is never reported later.
    ///
    /// # Errors
    /// State or balance query failures. Transport failures are logged and
    /// reported as [`GateOutcome::Failed`].
    pub async fn on_commit(&self, event: &CommitEvent) -> anyhow::Result<GateOutcome> {
        if !self.ephemeral.utxo_found().await? {
            return Ok(GateOutcome::Idle);
        }
        self.ephemeral.clear_utxo_found().await?;

        if !event.sync_mode {
            return Ok(GateOutcome::NotSynced);
        }

        let Some(address) = self.address.as_deref() else {
            warn!("utxo.found was set but no watched address is configured");
            return Ok(GateOutcome::NoAddress);
        };

        let balance = self
            .ledger
            .query_i64(&Query::unspent_balance(address))
            .await
            .with_context(|| format!("unspent balance for {address}"))?
            .unwrap_or(0);

        let payload = WebhookPayload::balance(balance, event.block, address);
        match self.notifier.post_json(&payload).await {
            Ok(response) => {
                info!("Discord response: {response}");
                Ok(GateOutcome::Sent { balance, response })
            }
            Err(e) => {
                warn!("Balance notification for block {} failed: {e}", event.block);
                Ok(GateOutcome::Failed {
                    balance,
                    error: e.to_string(),
                })
            }
        }
    }
}
