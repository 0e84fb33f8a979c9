//! Username → PlayerId cache
//!
//! Entries are written once and then only read until they expire; a second
//! `put` for a live key keeps the first value.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use mojang_uuid::PlayerId;

#[async_trait]
pub trait UuidCache: Send + Sync {
    async fn get(&self, username: &str) -> Option<PlayerId>;
    async fn put(&self, username: &str, id: PlayerId, ttl: Duration);
}

#[derive(Debug, Clone)]
struct CachedId {
    id: PlayerId,
    ttl: Duration,
}

/// Expires each entry after the ttl it was stored with
struct PerEntryTtl;

impl Expiry<String, CachedId> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedId,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-memory [`UuidCache`] on a moka async cache
#[derive(Clone)]
pub struct MokaUuidCache {
    cache: Cache<String, CachedId>,
}

impl MokaUuidCache {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl UuidCache for MokaUuidCache {
    async fn get(&self, username: &str) -> Option<PlayerId> {
        self.cache.get(username).await.map(|cached| cached.id)
    }

    async fn put(&self, username: &str, id: PlayerId, ttl: Duration) {
        self.cache
            .entry(username.to_string())
            .or_insert(CachedId { id, ttl })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> PlayerId {
        mojang_uuid::decode(raw).unwrap()
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = MokaUuidCache::new(100);
        let mikroskeem = id("4d03444c2e0b4b8ea445a2965c907676");

        assert_eq!(cache.get("mikroskeem").await, None);
        cache
            .put("mikroskeem", mikroskeem, Duration::from_secs(60))
            .await;
        assert_eq!(cache.get("mikroskeem").await, Some(mikroskeem));
    }

    #[tokio::test]
    async fn test_keys_are_case_sensitive() {
        let cache = MokaUuidCache::new(100);
        cache
            .put(
                "Notch",
                id("069a79f444e94726a5befca90e38aaf5"),
                Duration::from_secs(60),
            )
            .await;
        assert_eq!(cache.get("notch").await, None);
    }

    #[tokio::test]
    async fn test_first_value_wins() {
        let cache = MokaUuidCache::new(100);
        let first = id("4d03444c2e0b4b8ea445a2965c907676");
        let second = id("069a79f444e94726a5befca90e38aaf5");

        cache.put("name", first, Duration::from_secs(60)).await;
        cache.put("name", second, Duration::from_secs(60)).await;
        assert_eq!(cache.get("name").await, Some(first));
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = MokaUuidCache::new(100);
        cache
            .put(
                "short",
                id("4d03444c2e0b4b8ea445a2965c907676"),
                Duration::from_millis(50),
            )
            .await;
        assert!(cache.get("short").await.is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(cache.get("short").await, None);
    }
}
