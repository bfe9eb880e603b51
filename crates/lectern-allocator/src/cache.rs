//! Shared Allocation Cache
//!
//! The allocator coordinates (loosely) between processes through a single
//! key-value entry in a shared cache. [`SharedCache`] is the seam: any
//! backend that can answer exists/get/set/delete on string payloads works.
//!
//! The trait offers **no** compare-and-set. The allocator reads the whole
//! snapshot, mutates it, and writes it back; concurrent writers are
//! last-writer-wins over the entire entry. See `BucketAllocator::allocate`
//! for the consequences.
//!
//! [`MemoryCache`] is the in-process backend used by tests and single-node
//! deployments.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Cache key under which the full allocation snapshot lives.
pub const ALLOCATION_CACHE_KEY: &str = "plugin:log";

/// A shared, externally visible key-value cache.
///
/// Implementations must be `Send + Sync` for sharing via
/// `Arc<dyn SharedCache>`.
#[async_trait]
pub trait SharedCache: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Delete the entry. Returns whether an entry existed; deleting an
    /// absent key is a successful no-op.
    async fn delete(&self, key: &str) -> Result<bool>;
}

/// In-process cache backed by a `HashMap` behind a tokio `RwLock`.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SharedCache for MemoryCache {
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.entries.read().await.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }
}
