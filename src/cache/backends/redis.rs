use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use crate::cache::CacheBackend;
use crate::cache::keys::{pattern_for, strip_prefix, token_key};
use crate::config::Config;
use crate::error::{CacheError, ConfigError};

/// Redis 缓存，所有键都放在 `prefix` 命名空间下
#[derive(Clone)]
pub struct RedisCache {
    redis: Arc<RedisClient>,
    prefix: String,
}

impl RedisCache {
    pub fn new(redis: Arc<RedisClient>, prefix: impl Into<String>) -> Self {
        Self {
            redis,
            prefix: prefix.into(),
        }
    }

    /// 按配置创建，缺少 `REDIS_URL` 或地址无效时立即失败
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let client = RedisClient::open(config.redis_url()?)?;
        Ok(Self::new(Arc::new(client), config.key_prefix.clone()))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    async fn namespaced_keys(
        &self,
        conn: &mut redis::aio::MultiplexedConnection,
    ) -> Result<Vec<String>, CacheError> {
        let mut keys: Vec<String> = conn.keys(pattern_for(&self.prefix)).await?;
        keys.retain(|key| key.starts_with(&self.prefix));
        Ok(keys)
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let result: Option<String> = conn.get(token_key(&self.prefix, key)).await?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let _: () = conn
            .set_ex(token_key(&self.prefix, key), value, ttl_secs)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let _: () = conn.del(token_key(&self.prefix, key)).await?;
        Ok(())
    }

    async fn reset(&self) -> Result<(), CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let keys = self.namespaced_keys(&mut conn).await?;
        if !keys.is_empty() {
            let _: () = conn.del(keys).await?;
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let keys = self.namespaced_keys(&mut conn).await?;
        Ok(keys
            .iter()
            .filter_map(|key| strip_prefix(&self.prefix, key))
            .map(str::to_owned)
            .collect())
    }
}
