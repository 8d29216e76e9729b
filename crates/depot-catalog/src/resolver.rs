//! Artifact URL resolution with a short-lived single-flight cache.
//!
//! Resolution delegates to the storage collaborator per request; URLs are
//! never persisted as entity state because their validity window and
//! signing scheme belong to the storage layer. The cache here is purely a
//! performance optimization: bounded, keyed by (project, version, build,
//! download), and with entry lifetimes strictly inside the requested URL
//! validity window so a cached URL is never served past it.
//!
//! Concurrency: the cache is the only shared mutable state in the query
//! engine. Each entry is a `tokio::sync::OnceCell`, giving at-most-one
//! in-flight resolution per key; concurrent requests for the same key
//! await the first resolution instead of issuing duplicate store calls.
//! Failed resolutions are not cached and retry on the next request.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

use depot_core::id::{ProjectId, VersionId};
use depot_core::model::{Build, Download, Project, Version};
use depot_core::storage::ArtifactStore;

use crate::error::Result;

/// Configuration for [`ArtifactResolver`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Validity window requested from the store for each URL.
    #[serde(with = "duration_secs")]
    pub url_ttl: Duration,
    /// How long a resolved URL may be served from the cache.
    ///
    /// Capped at half of `url_ttl` so cached URLs always leave the cache
    /// well before they stop working.
    #[serde(with = "duration_secs")]
    pub cache_ttl: Duration,
    /// Maximum number of cached entries. When the cache is full of fresh
    /// entries, further keys are resolved uncached instead of growing
    /// the map.
    pub cache_capacity: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            url_ttl: Duration::from_secs(15 * 60),
            cache_ttl: Duration::from_secs(60),
            cache_capacity: 4096,
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    project: ProjectId,
    version: VersionId,
    build: u32,
    download: String,
}

#[derive(Debug, Clone)]
struct CachedUrl {
    url: String,
    expires_at: Instant,
}

impl CachedUrl {
    fn fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Resolves downloads into fetchable URLs via the storage collaborator.
pub struct ArtifactResolver {
    store: Arc<dyn ArtifactStore>,
    url_ttl: Duration,
    entry_ttl: Duration,
    capacity: usize,
    cache: DashMap<CacheKey, Arc<OnceCell<CachedUrl>>>,
}

impl ArtifactResolver {
    /// Creates a resolver over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn ArtifactStore>, config: ResolverConfig) -> Self {
        let entry_ttl = config.cache_ttl.min(config.url_ttl / 2);
        Self {
            store,
            url_ttl: config.url_ttl,
            entry_ttl,
            capacity: config.cache_capacity.max(1),
            cache: DashMap::new(),
        }
    }

    /// Resolves one download of a build into a fetchable URL.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if the store has no object for
    /// the download's key, and `CatalogError::Collaborator` for
    /// unexpected store faults. Neither outcome is cached.
    pub async fn resolve(
        &self,
        project: &Project,
        version: &Version,
        build: &Build,
        download: &Download,
    ) -> Result<String> {
        let key = CacheKey {
            project: project.id,
            version: version.id,
            build: build.number,
            download: download.name.clone(),
        };

        // Two passes: a stale entry found on the first pass is evicted
        // and re-resolved on the second.
        for _ in 0..2 {
            let Some(cell) = self.cell(&key) else {
                break;
            };
            let cached = cell
                .get_or_try_init(|| async {
                    let url = self
                        .store
                        .resolve_url(&download.storage_key, self.url_ttl)
                        .await?;
                    tracing::debug!(key = %download.storage_key, "resolved artifact url");
                    Ok::<_, depot_core::Error>(CachedUrl {
                        url,
                        expires_at: Instant::now() + self.entry_ttl,
                    })
                })
                .await?;
            if cached.fresh() {
                return Ok(cached.url.clone());
            }
            self.cache.remove(&key);
        }

        // Reached when the cache is full of fresh entries or a degenerate
        // TTL expires an entry within a single call; resolve uncached
        // rather than growing the map or serving a stale URL.
        let url = self
            .store
            .resolve_url(&download.storage_key, self.url_ttl)
            .await?;
        Ok(url)
    }

    /// Drops every cached URL.
    ///
    /// Call when the storage layer rotates keys or signing material so
    /// that no rotated-out URL is ever served from the cache.
    pub fn invalidate_all(&self) {
        self.cache.clear();
    }

    /// Number of entries currently held by the cache.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Returns the single-flight cell for `key`, or `None` when the
    /// cache is at capacity and eviction freed nothing.
    fn cell(&self, key: &CacheKey) -> Option<Arc<OnceCell<CachedUrl>>> {
        if self.cache.len() >= self.capacity && !self.cache.contains_key(key) {
            self.evict_expired();
            if self.cache.len() >= self.capacity {
                return None;
            }
        }
        Some(self.cache.entry(key.clone()).or_default().clone())
    }

    fn evict_expired(&self) {
        self.cache.retain(|_, cell| match cell.get() {
            Some(cached) => cached.fresh(),
            // Uninitialized cells have a resolution in flight; keep them.
            None => true,
        });
    }
}
