mod noop_store;
mod redis_store;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use noop_store::NoopCacheStore;
use redis_store::RedisCacheStore;

/// Guild settings are read on nearly every command, edits invalidate eagerly.
pub const SETTINGS_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
/// Roblox account lookups rarely change within a session.
pub const ROBLOX_USER_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone, Debug)]
enum CacheBackend {
    Disabled(NoopCacheStore),
    Redis(RedisCacheStore),
}

#[derive(Clone, Debug)]
pub struct CacheService {
    key_prefix: String,
    backend: CacheBackend,
}

impl CacheService {
    pub fn disabled(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Disabled(NoopCacheStore),
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Redis(RedisCacheStore::from_url(redis_url)?),
        })
    }

    pub fn is_redis_enabled(&self) -> bool {
        matches!(self.backend, CacheBackend::Redis(_))
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            CacheBackend::Disabled(_) => "disabled",
            CacheBackend::Redis(_) => "redis",
        }
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled(_) => Ok(()),
            CacheBackend::Redis(store) => store.ping().await,
        }
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    pub async fn get_json<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let value = match &self.backend {
            CacheBackend::Disabled(store) => store.get(key).await,
            CacheBackend::Redis(store) => store.get(key).await,
        }?;

        match value {
            Some(bytes) => {
                let parsed = serde_json::from_slice(&bytes).map_err(|e| {
                    anyhow::anyhow!("failed to deserialize cache value for `{key}`: {e}")
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    pub async fn set_json<T>(&self, key: &str, value: &T, ttl: Duration) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let ttl_seconds = ttl.as_secs().max(1);
        let payload = serde_json::to_vec(value)
            .map_err(|e| anyhow::anyhow!("failed to serialize cache value for `{key}`: {e}"))?;

        match &self.backend {
            CacheBackend::Disabled(store) => store.set(key, payload, ttl_seconds).await,
            CacheBackend::Redis(store) => store.set(key, payload, ttl_seconds).await,
        }
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled(store) => store.del(key).await,
            CacheBackend::Redis(store) => store.del(key).await,
        }
    }

    /// Read-through helper: serve from cache, otherwise load and populate.
    ///
    /// Cache errors never fail the call; the loader result wins.
    pub async fn get_or_load_json<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        match self.get_json::<T>(key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(
                ?e,
                cache_key = key,
                "cache get failed; falling back to source"
            ),
        }

        let loaded = loader().await?;

        if let Err(e) = self.set_json(key, &loaded, ttl).await {
            warn!(?e, cache_key = key, "cache set failed; returning source value");
        }

        Ok(loaded)
    }
}

pub fn guild_settings_key(cache: &CacheService, guild_id: u64) -> String {
    cache.key(format!("guild:{guild_id}:settings"))
}

pub fn shift_types_key(cache: &CacheService, guild_id: u64) -> String {
    cache.key(format!("guild:{guild_id}:shift_types"))
}

pub fn roblox_user_key(cache: &CacheService, username: &str) -> String {
    cache.key(format!("roblox:user:{}", username.to_ascii_lowercase()))
}

pub fn roblox_headshot_key(cache: &CacheService, roblox_id: u64) -> String {
    cache.key(format!("roblox:headshot:{roblox_id}"))
}

/// Drop a cached entry after a write. Failures are logged only: the write has
/// already landed and the entry expires with its TTL.
async fn invalidate(cache: &CacheService, key: &str) {
    if let Err(e) = cache.del(key).await {
        warn!(?e, cache_key = key, "cache invalidation failed; entry expires with its ttl");
    }
}

pub async fn invalidate_guild_settings(cache: &CacheService, guild_id: u64) {
    invalidate(cache, &guild_settings_key(cache, guild_id)).await;
}

pub async fn invalidate_shift_types(cache: &CacheService, guild_id: u64) {
    invalidate(cache, &shift_types_key(cache, guild_id)).await;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{
        CacheService, guild_settings_key, invalidate_guild_settings, invalidate_shift_types,
        roblox_user_key,
    };

    #[test]
    fn keys_are_prefixed_and_normalized() {
        let cache = CacheService::disabled("lapd:test");
        assert_eq!(guild_settings_key(&cache, 7), "lapd:test:guild:7:settings");
        assert_eq!(
            roblox_user_key(&cache, "John_Doe"),
            "lapd:test:roblox:user:john_doe"
        );
    }

    #[tokio::test]
    async fn disabled_backend_always_loads_from_source() {
        let cache = CacheService::disabled("lapd:test");
        assert!(!cache.is_redis_enabled());

        let first: u32 = cache
            .get_or_load_json("k", Duration::from_secs(10), || async { Ok(1) })
            .await
            .unwrap();
        let second: u32 = cache
            .get_or_load_json("k", Duration::from_secs(10), || async { Ok(2) })
            .await
            .unwrap();

        assert_eq!((first, second), (1, 2));
    }

    #[tokio::test]
    async fn unreachable_redis_degrades_to_source() {
        let cache = CacheService::redis("redis://127.0.0.1:1", "lapd:test").unwrap();

        let loaded: u32 = cache
            .get_or_load_json("k", Duration::from_secs(10), || async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(loaded, 7);

        invalidate_guild_settings(&cache, 1).await;
        invalidate_shift_types(&cache, 1).await;
        assert!(cache.ping().await.is_err());
    }
}
