//! 需要真实的 Redis：`REDIS_URL=redis://127.0.0.1:6379 cargo test -- --ignored`

use std::sync::Arc;
use std::time::Duration;

use passwordless_cache_store::{
    CacheBackend, Config, RedisCache, TokenRecord, TokenStore, Verification,
};
use redis::AsyncCommands;
use uuid::Uuid;

struct Fixture {
    client: redis::Client,
    cache: Arc<RedisCache>,
    store: TokenStore,
    prefix: String,
}

fn fixture() -> Option<Fixture> {
    let url = std::env::var("REDIS_URL").ok()?;
    let prefix = format!("passwordless-test:{}:", Uuid::new_v4());
    let config = Config {
        redis_url: Some(url.clone()),
        key_prefix: prefix.clone(),
        hash_cost: 4,
    };
    let cache = Arc::new(RedisCache::from_config(&config).unwrap());
    let store = TokenStore::from_config(cache.clone(), &config);
    Some(Fixture {
        client: redis::Client::open(url).unwrap(),
        cache,
        store,
        prefix,
    })
}

#[tokio::test]
#[ignore]
async fn redis_store_contract() {
    let Some(fx) = fixture() else { return };
    let store = &fx.store;
    let ttl = Duration::from_millis(60_000);

    store
        .store_or_update("abc-123", "a@example.com", ttl, Some("http://example.com/x"))
        .await
        .unwrap();
    assert_eq!(
        store.authenticate("abc-123", "a@example.com").await.unwrap(),
        Verification::Valid {
            origin_url: "http://example.com/x".into()
        }
    );
    assert_eq!(
        store.authenticate("wrong", "a@example.com").await.unwrap(),
        Verification::Invalid
    );

    let json = fx.cache.get("a@example.com").await.unwrap().unwrap();
    let record: TokenRecord = serde_json::from_str(&json).unwrap();
    assert_ne!(record.hashed_token, "abc-123");

    store.store_or_update("t2", "b@example.com", ttl, None).await.unwrap();
    assert_eq!(store.length().await.unwrap(), 2);

    let mut keys = fx.cache.keys().await.unwrap();
    keys.sort();
    assert_eq!(keys, vec!["a@example.com".to_string(), "b@example.com".to_string()]);

    store.invalidate_user("a@example.com").await.unwrap();
    store.invalidate_user("a@example.com").await.unwrap();
    assert!(!store.authenticate("abc-123", "a@example.com").await.unwrap().is_valid());
    assert_eq!(store.length().await.unwrap(), 1);

    store.clear().await.unwrap();
    assert_eq!(store.length().await.unwrap(), 0);
}

#[tokio::test]
#[ignore]
async fn redis_ttl_is_rounded_up() {
    let Some(fx) = fixture() else { return };
    fx.store
        .store_or_update("abc-123", "a@example.com", Duration::from_millis(1500), None)
        .await
        .unwrap();

    let mut conn = fx.client.get_multiplexed_async_connection().await.unwrap();
    let ttl: i64 = conn
        .ttl(format!("{}a@example.com", fx.prefix))
        .await
        .unwrap();
    assert!((1..=2).contains(&ttl), "unexpected ttl {}", ttl);

    fx.store.clear().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn reset_keeps_keys_outside_the_namespace() {
    let Some(fx) = fixture() else { return };
    let mut conn = fx.client.get_multiplexed_async_connection().await.unwrap();

    // 与前缀共享开头但不在命名空间内的键
    let foreign = fx.prefix.trim_end_matches(':').to_string();
    let _: () = conn.set_ex(&foreign, "keep", 60).await.unwrap();

    fx.store
        .store_or_update("abc-123", "a@example.com", Duration::from_secs(60), None)
        .await
        .unwrap();
    fx.store.clear().await.unwrap();

    let kept: Option<String> = conn.get(&foreign).await.unwrap();
    assert_eq!(kept.as_deref(), Some("keep"));
    assert_eq!(fx.store.length().await.unwrap(), 0);

    let _: () = conn.del(&foreign).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn glob_prefix_only_touches_its_own_keys() {
    let Ok(url) = std::env::var("REDIS_URL") else { return };
    let run = Uuid::new_v4();
    let config = Config {
        redis_url: Some(url.clone()),
        key_prefix: format!("tok{}*", run),
        hash_cost: 4,
    };
    let cache = RedisCache::from_config(&config).unwrap();

    let client = redis::Client::open(url).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    let foreign = format!("tok{}en:abc", run);
    let _: () = conn.set_ex(&foreign, "keep", 60).await.unwrap();

    cache.set("a@example.com", "{}".into(), 60).await.unwrap();
    assert_eq!(cache.keys().await.unwrap(), vec!["a@example.com".to_string()]);

    cache.reset().await.unwrap();
    let kept: Option<String> = conn.get(&foreign).await.unwrap();
    assert_eq!(kept.as_deref(), Some("keep"));
    assert!(cache.keys().await.unwrap().is_empty());

    let _: () = conn.del(&foreign).await.unwrap();
}
