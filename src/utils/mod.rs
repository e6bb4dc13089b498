use bcrypt::{hash, verify};
use sha2::{Digest, Sha256};
use tokio::task;

use crate::error::StoreResult;

/// 默认 bcrypt 成本因子
pub const DEFAULT_HASH_COST: u32 = 10;
pub const MIN_HASH_COST: u32 = 4;
pub const MAX_HASH_COST: u32 = 31;

/// bcrypt 只取前 72 字节，先做 SHA-256 摘要，保证整个令牌都参与比较
fn token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// 对令牌加盐哈希。bcrypt 是 CPU 密集操作，放到阻塞线程池执行
pub async fn hash_token(token: &str, cost: u32) -> StoreResult<String> {
    let digest = token_digest(token);
    let hashed = task::spawn_blocking(move || hash(digest.as_bytes(), cost)).await??;
    Ok(hashed)
}

/// 校验令牌与存储的哈希是否匹配
pub async fn verify_token(token: &str, hashed: &str) -> StoreResult<bool> {
    let digest = token_digest(token);
    let hashed = hashed.to_owned();
    let matched = task::spawn_blocking(move || verify(digest.as_bytes(), &hashed)).await??;
    Ok(matched)
}
