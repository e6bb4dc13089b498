use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 每个用户一条的令牌记录，缓存键即 `uid`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// bcrypt 哈希，从不存明文
    pub hashed_token: String,
    pub uid: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<String>,
}

impl TokenRecord {
    /// 严格小于：到达 `expires_at` 即失效
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
