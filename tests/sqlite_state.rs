use tempfile::NamedTempFile;
use utxo_watch::store::{SqliteState, StateStore, LAST_TX_INPUTS_SLOT};

#[tokio::test]
async fn sqlite_state_roundtrips_and_survives_reopen() -> anyhow::Result<()> {
    // temp file for each run
    let tmp = NamedTempFile::new()?;
    let path = tmp.path().to_path_buf();

    let store = SqliteState::new(&path)?;

    // Defaults on a fresh DB
    assert_eq!(store.get(LAST_TX_INPUTS_SLOT).await?, None);
    assert_eq!(
        store.last_tx_inputs_slot().await?,
        0,
        "fresh DB starts at watermark 0"
    );
    assert!(!store.utxo_found().await?);

    store.set_last_tx_inputs_slot(123_456).await?;
    store.set_last_tx_inputs_slot(123_789).await?;
    assert_eq!(store.last_tx_inputs_slot().await?, 123_789);

    // A new handle on the same file sees the watermark (process restart).
    drop(store);
    let reopened = SqliteState::new(&path)?;
    assert_eq!(reopened.last_tx_inputs_slot().await?, 123_789);

    reopened.mark_utxo_found().await?;
    assert!(reopened.utxo_found().await?);
    reopened.clear_utxo_found().await?;
    assert!(!reopened.utxo_found().await?);
    // removing an absent key is fine
    reopened.clear_utxo_found().await?;

    Ok(())
}

#[tokio::test]
async fn corrupt_watermark_is_an_error() -> anyhow::Result<()> {
    let tmp = NamedTempFile::new()?;
    let store = SqliteState::new(tmp.path())?;

    store.put(LAST_TX_INPUTS_SLOT, "not-a-slot".into()).await?;
    let err = store.last_tx_inputs_slot().await.unwrap_err();
    assert!(err.to_string().contains(LAST_TX_INPUTS_SLOT));
    Ok(())
}
