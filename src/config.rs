//! Configuration lookup by dotted property key.
use dotenv::dotenv;
use std::collections::HashMap;
use std::env;

/// Watched address. Empty or absent means nothing passes the filter.
pub const ADDRESS_FILTER: &str = "address.filter";

/// Destination URL for balance notifications.
pub const DISCORD_WEBHOOK_URL: &str = "discord.webhook.url";

/// Read-only property lookup.
pub trait Properties: Send + Sync {
    /// Raw value for `key`, if set.
    fn property(&self, key: &str) -> Option<String>;

    /// Like [`Properties::property`] but treats blank values as unset.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.property(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Properties backed by the process environment (and `.env`, if present).
///
/// `address.filter` is read from `ADDRESS_FILTER`,
/// `discord.webhook.url` from `DISCORD_WEBHOOK_URL`.
#[derive(Debug, Clone, Default)]
pub struct EnvProperties;

impl EnvProperties {
    /// Load `.env` and return the environment-backed provider.
    pub fn from_env() -> Self {
        dotenv().ok();
        Self
    }
}

impl Properties for EnvProperties {
    fn property(&self, key: &str) -> Option<String> {
        env::var(env_key(key)).ok()
    }
}

impl Properties for HashMap<String, String> {
    fn property(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// `discord.webhook.url` -> `DISCORD_WEBHOOK_URL`
fn env_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}
