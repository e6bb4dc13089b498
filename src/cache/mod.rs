// 缓存模块
// 令牌存储所依赖的 TTL 键值缓存接口及其实现

pub mod backends;
pub mod keys;
pub mod models;

use async_trait::async_trait;

use crate::error::CacheError;

pub use backends::{MemoryCache, RedisCache};
pub use models::TokenRecord;

/// 带 TTL 的键值缓存
///
/// 值是序列化后的 JSON 字符串。实现需自行保证并发安全。
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// 读取键，不存在或已过期时返回 `None`
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// 写入键并设置过期秒数，覆盖已有值
    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError>;

    /// 删除键，键不存在不算错误
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// 清空本缓存命名空间下的所有键
    async fn reset(&self) -> Result<(), CacheError>;

    /// 列出本缓存命名空间下的所有键
    async fn keys(&self) -> Result<Vec<String>, CacheError>;
}
