use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::cache::CacheBackend;
use crate::clock::{Clock, SystemClock};
use crate::error::CacheError;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// 进程内缓存，过期条目在读取时不可见，写入和枚举时顺带清理
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    fn purge_expired(entries: &mut HashMap<String, Entry>, now: DateTime<Utc>) {
        entries.retain(|_, entry| now < entry.expires_at);
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = self.clock.now();
        let entries = self.entries.read().await;

        Ok(entries
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError> {
        if ttl_secs == 0 {
            return Err(CacheError::Backend("ttl must be at least one second".into()));
        }
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| CacheError::Backend(format!("ttl of {}s is out of range", ttl_secs)))?;

        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| CacheError::Backend(format!("ttl of {}s is out of range", ttl_secs)))?;

        let mut entries = self.entries.write().await;
        Self::purge_expired(&mut entries, now);
        entries.insert(key.to_string(), Entry { value, expires_at });

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn reset(&self) -> Result<(), CacheError> {
        self.entries.write().await.clear();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        Self::purge_expired(&mut entries, now);

        Ok(entries.keys().cloned().collect())
    }
}
