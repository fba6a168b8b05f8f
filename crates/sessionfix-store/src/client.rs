//! The cache-client seam and an in-memory implementation.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use sessionfix_core::SessionFixResult;

/// The host-supplied cache handle: get/set/delete by key, with expiry.
///
/// Implementations report their own failures as
/// [`SessionFixError::Cache`](sessionfix_core::SessionFixError::Cache);
/// atomicity and locking discipline belong to the backend, not to this
/// layer.
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Fetches the value stored under `key`, if any.
    async fn get(&self, key: &str) -> SessionFixResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, expiring after `ttl` when given.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> SessionFixResult<()>;

    /// Removes the value stored under `key`. Removing a missing key is
    /// not an error.
    async fn delete(&self, key: &str) -> SessionFixResult<()>;
}

struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

/// A process-local [`CacheClient`].
///
/// Expired entries are skipped on read and overwritten on write; there is
/// no background eviction. Suitable for tests and single-process
/// deployments.
#[derive(Default)]
pub struct InMemoryCacheClient {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryCacheClient {
    /// Creates an empty client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheClient for InMemoryCacheClient {
    async fn get(&self, key: &str) -> SessionFixResult<Option<Vec<u8>>> {
        let entries = self.entries.read();
        Ok(entries.get(key).and_then(|entry| match entry.expires_at {
            Some(at) if at <= Instant::now() => None,
            _ => Some(entry.value.clone()),
        }))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> SessionFixResult<()> {
        let entry = Entry {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> SessionFixResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}
