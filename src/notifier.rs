//! Outbound balance notifications (Discord-style JSON webhooks).
use async_trait::async_trait;
use serde::Serialize;
use std::error::Error;
use std::fmt;

/// Body of a webhook POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    /// Message text.
    pub content: String,
}

impl WebhookPayload {
    /// Balance announcement for `address` as of `block`.
    pub fn balance(balance: i64, block: u64, address: &str) -> Self {
        Self {
            content: format!(
                "💰 Unspent UTXO Balance: {balance} Lovelace at Block: {block}\n Address: {address}"
            ),
        }
    }
}

/// What the remote end answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, possibly empty.
    pub body: String,
}

impl fmt::Display for NotifyResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "{}", self.status)
        } else {
            write!(f, "{} {}", self.status, self.body)
        }
    }
}

/// Error type for notification delivery
#[derive(Debug)]
pub enum NotifyError {
    /// No destination configured
    MissingUrl,
    /// Error from the HTTP client
    #[cfg(feature = "webhook")]
    HttpError(reqwest::Error),
    /// Remote answered with a non-success status
    Rejected(NotifyResponse),
    /// Other error
    Other(String),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::MissingUrl => write!(f, "No webhook URL configured"),
            #[cfg(feature = "webhook")]
            NotifyError::HttpError(e) => write!(f, "HTTP error: {}", e),
            NotifyError::Rejected(r) => write!(f, "Webhook rejected notification: {}", r),
            NotifyError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl Error for NotifyError {}

#[cfg(feature = "webhook")]
impl From<reqwest::Error> for NotifyError {
    fn from(error: reqwest::Error) -> Self {
        NotifyError::HttpError(error)
    }
}

/// Transport for notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// POST `payload` as JSON. Non-2xx answers are errors.
    async fn post_json(&self, payload: &WebhookPayload) -> Result<NotifyResponse, NotifyError>;
}

#[cfg(feature = "webhook")]
pub use webhook::WebhookNotifier;

#[cfg(feature = "webhook")]
mod webhook {
    use super::*;
    use reqwest::{header, Client};
    use std::time::Duration;

    use crate::config::{Properties, DISCORD_WEBHOOK_URL};

    /// [`Notifier`] over `reqwest`.
    pub struct WebhookNotifier {
        client: Client,
        url: Option<String>,
    }

    impl WebhookNotifier {
        /// Notifier posting to `url`. `None` makes every send fail with
        /// [`NotifyError::MissingUrl`].
        pub fn new(url: Option<String>) -> Result<Self, NotifyError> {
            let client = Client::builder()
                .timeout(Duration::from_secs(10))
                .connect_timeout(Duration::from_secs(5))
                .build()
                .map_err(|e| NotifyError::Other(format!("Failed to create HTTP client: {}", e)))?;
            Ok(Self { client, url })
        }

        /// Notifier posting to `discord.webhook.url`.
        pub fn from_properties(props: &dyn Properties) -> Result<Self, NotifyError> {
            Self::new(props.non_empty(DISCORD_WEBHOOK_URL))
        }
    }

    #[async_trait]
    impl Notifier for WebhookNotifier {
        async fn post_json(
            &self,
            payload: &WebhookPayload,
        ) -> Result<NotifyResponse, NotifyError> {
            let url = self.url.as_deref().ok_or(NotifyError::MissingUrl)?;

            let response = self
                .client
                .post(url)
                .header(header::CONTENT_TYPE, "application/json")
                .json(payload)
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;
            let answer = NotifyResponse {
                status: status.as_u16(),
                body,
            };

            if status.is_success() {
                Ok(answer)
            } else {
                Err(NotifyError::Rejected(answer))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_payload_mentions_amount_block_and_address() {
        let p = WebhookPayload::balance(1_500_000, 123_456, "addr_test1xyz");
        assert!(p.content.contains("1500000"));
        assert!(p.content.contains("123456"));
        assert!(p.content.contains("addr_test1xyz"));

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["content"], p.content);
        assert_eq!(json.as_object().map(|o| o.len()), Some(1));
    }
}
