use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use utxo_watch::gate::{GateOutcome, NotificationGate};
use utxo_watch::ledger::Query;
use utxo_watch::prelude::*;
use utxo_watch::{NotifyError, NotifyResponse, WebhookPayload};

const ADDR: &str = "addr_test1qz_watched";

/// Ledger stub answering every balance query with a fixed value.
struct FixedBalance {
    balance: Option<i64>,
    queries: Arc<Mutex<Vec<Query>>>,
}

#[async_trait]
impl QueryExecutor for FixedBalance {
    async fn update(&self, query: &Query) -> anyhow::Result<u64> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(0)
    }
    async fn query_i64(&self, query: &Query) -> anyhow::Result<Option<i64>> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.balance)
    }
}

/// Transport that records payloads and optionally fails.
#[derive(Clone, Default)]
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<WebhookPayload>>>,
    fail: bool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn post_json(&self, payload: &WebhookPayload) -> Result<NotifyResponse, NotifyError> {
        self.sent.lock().unwrap().push(payload.clone());
        if self.fail {
            Err(NotifyError::Other("webhook unreachable".into()))
        } else {
            Ok(NotifyResponse {
                status: 204,
                body: String::new(),
            })
        }
    }
}

struct Harness {
    gate: NotificationGate<MemoryState, FixedBalance, RecordingNotifier>,
    state: Arc<MemoryState>,
    queries: Arc<Mutex<Vec<Query>>>,
    sent: Arc<Mutex<Vec<WebhookPayload>>>,
}

fn harness(balance: Option<i64>, fail: bool) -> Harness {
    let state = Arc::new(MemoryState::new());
    let queries = Arc::new(Mutex::new(Vec::new()));
    let notifier = RecordingNotifier {
        fail,
        ..Default::default()
    };
    let sent = notifier.sent.clone();
    let ledger = Arc::new(FixedBalance {
        balance,
        queries: queries.clone(),
    });
    Harness {
        gate: NotificationGate::new(Some(ADDR.into()), state.clone(), ledger, notifier),
        state,
        queries,
        sent,
    }
}

fn event(block: u64, sync_mode: bool) -> CommitEvent {
    CommitEvent {
        slot: 1_000,
        block,
        sync_mode,
    }
}

#[tokio::test]
async fn idle_gate_does_nothing() -> anyhow::Result<()> {
    let h = harness(Some(1), false);

    let out = h.gate.on_commit(&event(1, true)).await?;

    assert_eq!(out, GateOutcome::Idle);
    assert!(h.queries.lock().unwrap().is_empty());
    assert!(h.sent.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn not_synced_consumes_flag_without_sending() -> anyhow::Result<()> {
    let h = harness(Some(1), false);
    h.state.mark_utxo_found().await?;

    let out = h.gate.on_commit(&event(1, false)).await?;

    assert_eq!(out, GateOutcome::NotSynced);
    assert!(!h.state.utxo_found().await?);
    assert!(h.queries.lock().unwrap().is_empty());
    assert!(h.sent.lock().unwrap().is_empty());

    // The dropped signal is not replayed once synced.
    assert_eq!(h.gate.on_commit(&event(2, true)).await?, GateOutcome::Idle);
    assert!(h.sent.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn synced_commit_sends_one_balance_notification() -> anyhow::Result<()> {
    let h = harness(Some(1_500_000), false);
    h.state.mark_utxo_found().await?;

    let out = h.gate.on_commit(&event(123_456, true)).await?;

    assert!(matches!(out, GateOutcome::Sent { balance: 1_500_000, .. }));
    assert!(!h.state.utxo_found().await?);
    assert_eq!(*h.queries.lock().unwrap(), vec![Query::unspent_balance(ADDR)]);

    let sent = h.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].content.contains("1500000"));
    assert!(sent[0].content.contains("123456"));
    assert!(sent[0].content.contains(ADDR));
    Ok(())
}

#[tokio::test]
async fn flag_is_consumed_exactly_once() -> anyhow::Result<()> {
    let h = harness(Some(10), false);
    h.state.mark_utxo_found().await?;

    h.gate.on_commit(&event(1, true)).await?;
    assert_eq!(h.gate.on_commit(&event(2, true)).await?, GateOutcome::Idle);
    assert_eq!(h.sent.lock().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn empty_balance_reports_zero() -> anyhow::Result<()> {
    let h = harness(None, false);
    h.state.mark_utxo_found().await?;

    let out = h.gate.on_commit(&event(7, true)).await?;

    assert!(matches!(out, GateOutcome::Sent { balance: 0, .. }));
    assert!(h.sent.lock().unwrap()[0].content.contains("Balance: 0 Lovelace"));
    Ok(())
}

#[tokio::test]
async fn transport_failure_is_swallowed_and_not_rearmed() -> anyhow::Result<()> {
    let h = harness(Some(99), true);
    h.state.mark_utxo_found().await?;

    let out = h.gate.on_commit(&event(5, true)).await?;

    match out {
        GateOutcome::Failed { balance, error } => {
            assert_eq!(balance, 99);
            assert!(error.contains("webhook unreachable"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(!h.state.utxo_found().await?);
    assert_eq!(h.sent.lock().unwrap().len(), 1);

    assert_eq!(h.gate.on_commit(&event(6, true)).await?, GateOutcome::Idle);
    assert_eq!(h.sent.lock().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn armed_without_address_sends_nothing() -> anyhow::Result<()> {
    let state = Arc::new(MemoryState::new());
    let notifier = RecordingNotifier::default();
    let sent = notifier.sent.clone();
    let ledger = Arc::new(FixedBalance {
        balance: Some(1),
        queries: Arc::new(Mutex::new(Vec::new())),
    });
    let gate = NotificationGate::new(None, state.clone(), ledger, notifier);
    state.mark_utxo_found().await?;

    assert_eq!(gate.on_commit(&event(1, true)).await?, GateOutcome::NoAddress);
    assert!(!state.utxo_found().await?);
    assert!(sent.lock().unwrap().is_empty());
    Ok(())
}
