use httpmock::prelude::*;
use serde_json::json;
use std::collections::HashMap;
use utxo_watch::config::DISCORD_WEBHOOK_URL;
use utxo_watch::prelude::*;
use utxo_watch::{NotifyError, WebhookPayload};

#[tokio::test]
async fn posts_json_payload() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let payload = WebhookPayload::balance(1_500_000, 123_456, "addr_test1");

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/webhooks/1/abc")
                .header("content-type", "application/json")
                .json_body(json!({ "content": payload.content }));
            then.status(204);
        })
        .await;

    let notifier = WebhookNotifier::new(Some(server.url("/api/webhooks/1/abc")))?;
    let response = notifier.post_json(&payload).await?;

    mock.assert_async().await;
    assert_eq!(response.status, 204);
    Ok(())
}

#[tokio::test]
async fn non_success_status_is_an_error() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(429).body("rate limited");
        })
        .await;

    let mut props = HashMap::new();
    props.insert(DISCORD_WEBHOOK_URL.to_string(), server.url("/hook"));
    let notifier = WebhookNotifier::from_properties(&props)?;

    let err = notifier
        .post_json(&WebhookPayload::balance(1, 1, "a"))
        .await
        .unwrap_err();

    mock.assert_async().await;
    match err {
        NotifyError::Rejected(r) => {
            assert_eq!(r.status, 429);
            assert_eq!(r.body, "rate limited");
        }
        other => panic!("expected Rejected, got {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn missing_url_surfaces_as_transport_error() -> anyhow::Result<()> {
    let props: HashMap<String, String> = HashMap::new();
    let notifier = WebhookNotifier::from_properties(&props)?;

    let err = notifier
        .post_json(&WebhookPayload::balance(1, 1, "a"))
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::MissingUrl));
    Ok(())
}
