//! Artifact store port: the storage collaborator contract.
//!
//! The catalog never persists download URLs. Each download carries an
//! opaque [`StorageKey`]; an [`ArtifactStore`] turns that key into a
//! fetchable URL at read time. How it does so (signing, expiry, CDN
//! rewriting) is entirely the store's business.
//!
//! Two implementations ship with this crate:
//! - [`MemoryStore`] for tests, producing mock signed URLs
//! - [`PublicUrlStore`] for stores that serve stable public URLs by
//!   joining a configured base URL with the storage key

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::{Error, Result};

/// Opaque identifier used by the storage collaborator to locate a
/// download's underlying file.
///
/// The catalog layer never interprets the contents of a key; only the
/// artifact store knows how to turn one into a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Creates a storage key from a raw string.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage collaborator port.
///
/// Implementations may apply signing, expiry or CDN rewriting internally;
/// the catalog only sees the resulting URL string.
#[async_trait]
pub trait ArtifactStore: Send + Sync + 'static {
    /// Produces a fetchable URL for the given storage key.
    ///
    /// `expiry` is the requested validity window. Stores that serve
    /// stable URLs may ignore it; signing stores must honor it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unavailable` if no object exists for the key, and
    /// `Error::Storage` for unexpected faults (timeouts, connection loss).
    /// The two are distinct: callers surface the former per-download and
    /// propagate the latter.
    async fn resolve_url(&self, key: &StorageKey, expiry: Duration) -> Result<String>;
}

#[derive(Debug, Clone, Copy)]
enum KeyState {
    Available,
    Faulty,
}

/// In-memory artifact store for testing.
///
/// Produces mock signed URLs for registered keys and reports everything
/// else as unavailable. Not suitable for production.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, KeyState>>,
    resolutions: AtomicU64,
}

impl MemoryStore {
    /// Creates a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a key so that it resolves successfully.
    pub fn register(&self, key: &StorageKey) {
        if let Ok(mut objects) = self.objects.write() {
            objects.insert(key.as_str().to_string(), KeyState::Available);
        }
    }

    /// Registers a key that fails with a storage fault when resolved.
    ///
    /// Used to exercise collaborator-failure paths in tests.
    pub fn register_faulty(&self, key: &StorageKey) {
        if let Ok(mut objects) = self.objects.write() {
            objects.insert(key.as_str().to_string(), KeyState::Faulty);
        }
    }

    /// Removes a key so that later resolutions report it unavailable.
    ///
    /// Simulates storage-side key rotation or object deletion.
    pub fn remove(&self, key: &StorageKey) {
        if let Ok(mut objects) = self.objects.write() {
            objects.remove(key.as_str());
        }
    }

    /// Returns how many times `resolve_url` has been invoked.
    ///
    /// Lets tests assert single-flight and caching behavior.
    #[must_use]
    pub fn resolution_count(&self) -> u64 {
        self.resolutions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn resolve_url(&self, key: &StorageKey, expiry: Duration) -> Result<String> {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        let objects = self.objects.read().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })?;

        match objects.get(key.as_str()) {
            Some(KeyState::Available) => Ok(format!(
                "memory://localhost/{key}?expires={}&signature=mock",
                expiry.as_secs()
            )),
            Some(KeyState::Faulty) => Err(Error::storage(format!("injected fault for {key}"))),
            None => Err(Error::unavailable(key.as_str())),
        }
    }
}

/// Configuration for [`PublicUrlStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUrlConfig {
    /// Base URL the storage keys are served under,
    /// e.g. `https://artifacts.example.org`.
    pub base_url: String,
}

/// Artifact store for backends that serve stable public URLs.
///
/// Resolution is pure string assembly: the store joins its base URL with
/// the storage key. Object existence is the serving backend's concern, so
/// this store never reports a key unavailable on its own.
#[derive(Debug, Clone)]
pub struct PublicUrlStore {
    base_url: String,
}

impl PublicUrlStore {
    /// Creates a store from configuration.
    #[must_use]
    pub fn new(config: PublicUrlConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ArtifactStore for PublicUrlStore {
    async fn resolve_url(&self, key: &StorageKey, _expiry: Duration) -> Result<String> {
        let path = key.as_str().trim_start_matches('/');
        Ok(format!("{}/{}", self.base_url, path))
    }
}
