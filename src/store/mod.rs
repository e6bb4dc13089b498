//! 无密码登录令牌存储
//!
//! 令牌以 bcrypt 哈希形式按用户标识保存在任意 [`CacheBackend`] 中，
//! 每个用户最多一条记录，新令牌覆盖旧令牌。

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use tracing::{debug, trace, warn};

use crate::cache::{CacheBackend, TokenRecord};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::utils::{DEFAULT_HASH_COST, MAX_HASH_COST, MIN_HASH_COST, hash_token, verify_token};

/// 令牌校验结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// 令牌匹配且未过期，附带存储时的来源地址（未提供时为空字符串）
    Valid { origin_url: String },
    /// 记录不存在、已过期或令牌不匹配
    Invalid,
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid { .. })
    }

    pub fn origin_url(&self) -> Option<&str> {
        match self {
            Verification::Valid { origin_url } => Some(origin_url),
            Verification::Invalid => None,
        }
    }
}

#[derive(Clone)]
pub struct TokenStore {
    cache: Arc<dyn CacheBackend>,
    clock: Arc<dyn Clock>,
    hash_cost: u32,
}

impl TokenStore {
    pub fn new(cache: Arc<dyn CacheBackend>) -> Self {
        Self {
            cache,
            clock: Arc::new(SystemClock),
            hash_cost: DEFAULT_HASH_COST,
        }
    }

    pub fn from_config(cache: Arc<dyn CacheBackend>, config: &Config) -> Self {
        Self::new(cache).with_hash_cost(config.hash_cost)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// bcrypt 成本因子，超出 4..=31 属于调用方编程错误
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        assert!(
            (MIN_HASH_COST..=MAX_HASH_COST).contains(&cost),
            "TokenStore: hash cost {} outside {}..={}",
            cost,
            MIN_HASH_COST,
            MAX_HASH_COST
        );
        self.hash_cost = cost;
        self
    }

    pub fn hash_cost(&self) -> u32 {
        self.hash_cost
    }

    /// 保存或覆盖 `uid` 的令牌
    ///
    /// 缓存 TTL 为 `ttl` 向上取整到秒，保证缓存条目不会早于记录本身的过期时间被淘汰。
    ///
    /// # Panics
    ///
    /// `token`、`uid` 为空或 `ttl` 为零时 panic。
    pub async fn store_or_update(
        &self,
        token: &str,
        uid: &str,
        ttl: Duration,
        origin_url: Option<&str>,
    ) -> StoreResult<()> {
        assert!(
            !token.is_empty() && !uid.is_empty() && !ttl.is_zero(),
            "TokenStore::store_or_update called with invalid parameters"
        );

        let ttl_delta = TimeDelta::from_std(ttl).map_err(|_| StoreError::TtlOutOfRange)?;
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl_delta)
            .ok_or(StoreError::TtlOutOfRange)?;

        let hashed_token = hash_token(token, self.hash_cost).await.inspect_err(|e| {
            warn!(error = %e, "Failed to hash token");
        })?;

        let record = TokenRecord {
            hashed_token,
            uid: uid.to_string(),
            expires_at,
            origin_url: origin_url.map(str::to_owned),
        };
        let json = serde_json::to_string(&record)?;

        self.cache
            .set(uid, json, ttl_to_secs(ttl))
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to store token"))?;

        trace!(uid = %uid, %expires_at, "Stored token");
        Ok(())
    }

    /// 校验 `uid` 的令牌
    ///
    /// 后端或哈希出错时返回 `Err`，与 [`Verification::Invalid`] 区分。
    ///
    /// # Panics
    ///
    /// `token` 或 `uid` 为空时 panic。
    pub async fn authenticate(&self, token: &str, uid: &str) -> StoreResult<Verification> {
        assert!(
            !token.is_empty() && !uid.is_empty(),
            "TokenStore::authenticate called with invalid parameters"
        );

        let Some(json) = self
            .cache
            .get(uid)
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to read token"))?
        else {
            trace!(uid = %uid, "No token stored");
            return Ok(Verification::Invalid);
        };

        let record: TokenRecord = serde_json::from_str(&json)?;
        if !record.is_live_at(self.clock.now()) {
            trace!(uid = %uid, expires_at = %record.expires_at, "Token expired");
            return Ok(Verification::Invalid);
        }

        let matched = verify_token(token, &record.hashed_token)
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to verify token"))?;

        if matched {
            Ok(Verification::Valid {
                origin_url: record.origin_url.unwrap_or_default(),
            })
        } else {
            trace!(uid = %uid, "Token mismatch");
            Ok(Verification::Invalid)
        }
    }

    /// 删除 `uid` 的令牌，不存在时同样成功
    ///
    /// # Panics
    ///
    /// `uid` 为空时 panic。
    pub async fn invalidate_user(&self, uid: &str) -> StoreResult<()> {
        assert!(
            !uid.is_empty(),
            "TokenStore::invalidate_user called with invalid parameters"
        );

        self.cache
            .delete(uid)
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to invalidate token"))?;

        trace!(uid = %uid, "Invalidated token");
        Ok(())
    }

    /// 删除所有令牌
    pub async fn clear(&self) -> StoreResult<()> {
        self.cache
            .reset()
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to clear tokens"))?;

        debug!("Cleared all tokens");
        Ok(())
    }

    /// 当前记录数
    ///
    /// 直接取后端键数量，后端尚未淘汰的过期记录也会被计入。
    pub async fn length(&self) -> StoreResult<usize> {
        let keys = self
            .cache
            .keys()
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to list tokens"))?;
        Ok(keys.len())
    }
}

/// 毫秒级 TTL 向上取整为秒
fn ttl_to_secs(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs
    }
}
