//! Process-local state; lost on restart.
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::store::StateStore;

/// In-memory [`StateStore`]. Safe to share between ingestion workers.
#[derive(Debug, Default)]
pub struct MemoryState {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryState {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.inner
            .lock()
            .map_err(|_| anyhow::anyhow!("memory state lock poisoned"))
    }
}

#[async_trait]
impl StateStore for MemoryState {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
