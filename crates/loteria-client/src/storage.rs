//! # Key-Value Storage
//!
//! Persistence for the bearer token and the logged-in user.
//!
//! Only the in-memory store lives here; a platform keychain or secure
//! storage plugs in by implementing [`KeyValueStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::ClientResult;

/// String storage keyed by name.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> ClientResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> ClientResult<()>;
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-process store; contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.get("token").await.unwrap().is_none());

        store.set("token", "abc").await.unwrap();
        store.set("token", "def").await.unwrap();
        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("def"));
        assert_eq!(store.len().await, 1);

        store.remove("token").await.unwrap();
        store.remove("token").await.unwrap();
        assert!(store.is_empty().await);
    }
}
