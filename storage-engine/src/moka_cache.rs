use aside::CachedEntity;
use aside::ports::EntityCache;
use async_trait::async_trait;
use moka::future::Cache;
use std::fmt::Debug;

/// Moka-based entity cache keyed by `CachedEntity::key`.
/// Entries never expire; an optional capacity bound turns on eviction.
pub struct MokaCache<E>
where
    E: CachedEntity,
{
    cache: Cache<String, E>,
}

impl<E> MokaCache<E>
where
    E: CachedEntity,
{
    /// Create a new unbounded Moka cache
    pub fn new_unbounded(name: &str) -> Self {
        Self::new(name, None)
    }

    /// Create a new bounded Moka cache with max entries
    pub fn new_bounded(name: &str, max_entries: u64) -> Self {
        Self::new(name, Some(max_entries))
    }

    /// Create a Moka cache from name and optional capacity
    pub fn new(name: &str, max_entries: Option<u64>) -> Self {
        let mut builder = Cache::builder().name(name);

        if let Some(capacity) = max_entries {
            builder = builder.max_capacity(capacity);
        }

        tracing::debug!("Created cache '{}' with capacity {:?}", name, max_entries);

        Self {
            cache: builder.build(),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl<E> EntityCache<E> for MokaCache<E>
where
    E: CachedEntity,
{
    async fn get(&self, id: &str) -> Option<E> {
        self.cache.get(id).await
    }

    async fn put(&self, entity: E) {
        let key = entity.key().to_string();
        tracing::trace!("Caching entity under '{}'", key);
        self.cache.insert(key, entity).await;
    }
}

impl<E> Debug for MokaCache<E>
where
    E: CachedEntity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("name", &self.cache.name())
            .field("entry_count", &self.cache.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .finish()
    }
}
