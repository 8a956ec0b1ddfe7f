//! In-memory response cache keyed by request URL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    expires_at: Instant,
}

/// Shared cache of successful upstream bodies.
///
/// A zero TTL disables the cache: reads miss and writes are dropped.
#[derive(Debug, Clone)]
pub struct CacheStore {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn is_disabled(&self) -> bool {
        self.ttl.is_zero()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| entry.body.clone())
    }

    pub async fn put(&self, key: impl Into<String>, body: impl Into<String>) {
        if self.is_disabled() {
            return;
        }

        let now = Instant::now();
        let entry = CacheEntry {
            body: body.into(),
            expires_at: now + self.ttl,
        };
        let mut entries = self.entries.write().await;
        entries.retain(|_, cached| now < cached.expires_at);
        entries.insert(key.into(), entry);
    }

    /// Drops every entry, forcing the next load to hit the network.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
