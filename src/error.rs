//! 错误类型
//!
//! “令牌无效”不是错误：它由 [`crate::store::Verification::Invalid`] 表示。
//! 这里的错误都意味着“无法判断”。

use thiserror::Error;

/// 缓存后端错误
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cache backend error: {0}")]
    Backend(String),
}

/// 令牌存储错误
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("token hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("token record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("time-to-live is too large to compute an expiry")]
    TtlOutOfRange,
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("invalid redis url: {0}")]
    Redis(#[from] redis::RedisError),
}

pub type StoreResult<T> = Result<T, StoreError>;
