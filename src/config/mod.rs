use std::env;

use crate::error::ConfigError;
use crate::utils::{DEFAULT_HASH_COST, MAX_HASH_COST, MIN_HASH_COST};

/// 默认的 Redis 键前缀
pub const DEFAULT_KEY_PREFIX: &str = "passwordless:token:";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub redis_url: Option<String>,
    pub key_prefix: String,
    pub hash_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            hash_cost: DEFAULT_HASH_COST,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源构建配置，便于测试
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let redis_url = lookup("REDIS_URL").filter(|url| !url.trim().is_empty());

        let key_prefix = lookup("TOKEN_KEY_PREFIX").unwrap_or_else(|| DEFAULT_KEY_PREFIX.into());
        if key_prefix.is_empty() {
            return Err(ConfigError::Invalid {
                key: "TOKEN_KEY_PREFIX",
                value: key_prefix,
            });
        }

        let hash_cost = match lookup("TOKEN_HASH_COST") {
            Some(raw) => parse_hash_cost(&raw)?,
            None => DEFAULT_HASH_COST,
        };

        Ok(Config {
            redis_url,
            key_prefix,
            hash_cost,
        })
    }

    pub fn redis_url(&self) -> Result<&str, ConfigError> {
        self.redis_url
            .as_deref()
            .ok_or(ConfigError::Missing("REDIS_URL"))
    }
}

fn parse_hash_cost(raw: &str) -> Result<u32, ConfigError> {
    let invalid = || ConfigError::Invalid {
        key: "TOKEN_HASH_COST",
        value: raw.to_string(),
    };

    let cost = raw.trim().parse::<u32>().map_err(|_| invalid())?;
    if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&cost) {
        return Err(invalid());
    }
    Ok(cost)
}
