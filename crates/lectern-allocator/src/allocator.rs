//! Bucket Allocator
//!
//! This module implements `BucketAllocator`, which resolves the bucket a
//! plugin log write should target and rotates buckets as they fill.
//!
//! ## Allocation Flow
//!
//! ```text
//! allocate(context)
//!         │
//!         ▼
//! cache entry exists? ──NO──→ initialize pools, persist identities,
//!         │                   publish snapshot, return the cursor slots
//!        YES                  (counts already include this write)
//!         │
//!         ▼
//! for each table the context writes to:
//!     advance that context's round-robin cursor
//!     read snapshot → instance at cursor slot
//!         │
//!     capacity left? ──YES──→ increment count, write snapshot back
//!         │
//!         NO
//!         ▼
//!     mint + persist a replacement identity (count = 1),
//!     swap it into the slot, write snapshot back
//! ```
//!
//! ## Cursors
//!
//! Three cursors, one per logging context, owned by the allocator as plain
//! atomic fields. A table is always advanced by the cursor of its own
//! context classification, so a workspace-scoped write advances the
//! workspace cursor for the workspace table and the generic cursor for the
//! generic table, and never touches the learnspace cursor.
//!
//! The cursor reset is **strictly greater than** the pool size: a cursor
//! equal to `pool_size` survives the reset and is clamped to slot 0 by the
//! bound check at fetch time, so slot 0 absorbs one extra write per cycle.
//! Operational tooling depends on the resulting slot sequence; keep the
//! boundary as is.
//!
//! ## Concurrency Caveats
//!
//! The shared snapshot is read-modified-written whole, with no
//! compare-and-set and no lock. Two processes allocating concurrently can
//! both read a slot at count `k` and both write back `k + 1`
//! (under-counting), or both rotate the same slot and mint two identities
//! of which one is immediately overwritten (orphaned in the metadata store,
//! where both remain persisted). Likewise two processes that both observe a
//! missing cache entry both initialize, and the last `set` wins. These are
//! accepted trade-offs of the single-blob cache protocol; callers must not
//! treat bucket counts as exact under concurrent load.
//!
//! Cursors are process-local, so separate processes each run their own
//! rotation over the shared pools.

use crate::cache::{SharedCache, ALLOCATION_CACHE_KEY};
use crate::config::BucketConfig;
use crate::error::{AllocatorError, Result};
use crate::initializer::BucketInitializer;
use lectern_core::{AllocationCache, BucketInstance, LogContext};
use lectern_metadata::BucketMetadataStore;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub struct BucketAllocator {
    cache: Arc<dyn SharedCache>,
    initializer: BucketInitializer,
    configs: Vec<BucketConfig>,
    generic_cursor: AtomicU32,
    workspace_cursor: AtomicU32,
    learnspace_cursor: AtomicU32,
}

impl BucketAllocator {
    pub fn new(
        cache: Arc<dyn SharedCache>,
        store: Arc<dyn BucketMetadataStore>,
        configs: Vec<BucketConfig>,
    ) -> Self {
        Self {
            cache,
            initializer: BucketInitializer::new(store),
            configs,
            generic_cursor: AtomicU32::new(0),
            workspace_cursor: AtomicU32::new(0),
            learnspace_cursor: AtomicU32::new(0),
        }
    }

    /// Resolve the bucket instances a log write under `context` should
    /// target: one per applicable table (the context's own table plus the
    /// generic table).
    ///
    /// The first call to find no published snapshot bootstraps the pools:
    /// every configured table gets `pool_size` freshly persisted
    /// identities, all at `current_count = 1`, and the bootstrapping write
    /// is handed the slot each cursor points at without a further
    /// increment. Every later call advances the applicable cursors,
    /// increments the selected instances, and rotates any instance that is
    /// out of capacity by swapping a new identity into its slot.
    ///
    /// Failures (cache I/O, snapshot decode, identity persist) abort the
    /// allocation for the table being processed; tables already resolved in
    /// the same call keep their cache updates. Nothing is retried here.
    pub async fn allocate(&self, context: LogContext) -> Result<Vec<BucketInstance>> {
        let bootstrapped = self.bootstrap_if_absent().await?;

        let mut resolved = Vec::new();
        for config in self.configs.iter().filter(|c| c.applies_to(context)) {
            let instance = match &bootstrapped {
                Some(snapshot) => self.initial_slot(snapshot, config)?,
                None => self.advance_slot(config).await?,
            };
            resolved.push(instance);
        }

        Ok(resolved)
    }

    /// Zero the round-robin cursor for the context that owns `table`.
    ///
    /// Operational recovery hook; fails on a table name outside the
    /// well-known log tables without touching any cursor.
    pub fn reset_round_robin(&self, table: &str) -> Result<()> {
        let context = LogContext::for_table(table)
            .ok_or_else(|| AllocatorError::UnknownTable(table.to_string()))?;

        self.cursor(context).store(0, Ordering::SeqCst);
        tracing::info!(table = %table, "reset round-robin cursor");

        Ok(())
    }

    /// Delete the published snapshot so the next write re-bootstraps every
    /// pool. Returns whether an entry existed; deleting an absent entry is
    /// still a success.
    pub async fn clear_cache(&self) -> Result<bool> {
        let deleted = self.cache.delete(ALLOCATION_CACHE_KEY).await?;
        if deleted {
            tracing::info!("cleared allocation cache");
        }
        Ok(deleted)
    }

    fn cursor(&self, context: LogContext) -> &AtomicU32 {
        match context {
            LogContext::Generic => &self.generic_cursor,
            LogContext::Workspace => &self.workspace_cursor,
            LogContext::Learnspace => &self.learnspace_cursor,
        }
    }

    /// Publish a freshly initialized snapshot if none exists, returning it
    /// so the bootstrapping call can resolve slots without re-reading.
    async fn bootstrap_if_absent(&self) -> Result<Option<AllocationCache>> {
        if self.cache.exists(ALLOCATION_CACHE_KEY).await? {
            return Ok(None);
        }

        tracing::info!("allocation cache absent, bootstrapping bucket pools");
        let snapshot = self.initializer.initialize(&self.configs).await?;
        self.cache
            .set(ALLOCATION_CACHE_KEY, serde_json::to_string(&snapshot)?)
            .await?;

        Ok(Some(snapshot))
    }

    /// Slot lookup for the bootstrapping write: the initializer already
    /// counted it into every instance, so the cursor is neither advanced
    /// nor the count incremented.
    fn initial_slot(
        &self,
        snapshot: &AllocationCache,
        config: &BucketConfig,
    ) -> Result<BucketInstance> {
        let context = self.context_of(config)?;
        let pool = snapshot
            .pool(&config.table)
            .ok_or_else(|| AllocatorError::UnknownTable(config.table.clone()))?;

        let (_, index) = self.slot_position(context, config.pool_size, pool.len());
        pool.get(index).cloned().ok_or_else(|| {
            AllocatorError::Cache(format!(
                "freshly initialized pool for {} is empty",
                config.table
            ))
        })
    }

    /// The cursor-driven path: pick the slot, increment or rotate it, and
    /// write the whole snapshot back.
    async fn advance_slot(&self, config: &BucketConfig) -> Result<BucketInstance> {
        let context = self.context_of(config)?;

        let raw = self.cache.get(ALLOCATION_CACHE_KEY).await?.ok_or_else(|| {
            AllocatorError::Cache("allocation cache disappeared mid-allocation".to_string())
        })?;
        let mut snapshot: AllocationCache = serde_json::from_str(&raw)?;

        let pool = snapshot
            .pool_mut(&config.table)
            .ok_or_else(|| AllocatorError::UnknownTable(config.table.clone()))?;
        if pool.is_empty() {
            return Err(AllocatorError::Cache(format!(
                "published snapshot holds an empty pool for {}",
                config.table
            )));
        }

        let (cursor_value, index) = self.slot_position(context, config.pool_size, pool.len());

        let resolved = if pool[index].has_capacity() {
            pool[index].current_count += 1;
            pool[index].clone()
        } else {
            let identity = self.initializer.persist_one(config).await?;
            let replacement =
                BucketInstance::first_write(identity, config.max_record_count, config.retention);
            tracing::debug!(
                table = %config.table,
                slot = index,
                retired = %pool[index].bucket_id(),
                replacement = %replacement.bucket_id(),
                "rotated full bucket"
            );
            pool[index] = replacement.clone();
            replacement
        };

        self.cache
            .set(ALLOCATION_CACHE_KEY, serde_json::to_string(&snapshot)?)
            .await?;

        tracing::debug!(
            table = %config.table,
            slot = index,
            bucket_id = %resolved.bucket_id(),
            count = resolved.current_count,
            "routed log write"
        );

        self.cursor(context).store(cursor_value + 1, Ordering::SeqCst);

        Ok(resolved)
    }

    /// Resolve the slot the context's cursor addresses.
    ///
    /// Two bound checks with different boundaries: the cursor resets only
    /// when *strictly greater* than the pool size, and a surviving value of
    /// exactly `pool_size` is clamped to slot 0 at fetch time. The
    /// returned `cursor_value` (pre-clamp) is what the caller stores back
    /// plus one.
    fn slot_position(
        &self,
        context: LogContext,
        pool_size: u32,
        pool_len: usize,
    ) -> (u32, usize) {
        let mut cursor_value = self.cursor(context).load(Ordering::SeqCst);
        if cursor_value > pool_size {
            cursor_value = 0;
        }

        let mut index = cursor_value as usize;
        if index >= pool_len {
            index = 0;
        }

        (cursor_value, index)
    }

    fn context_of(&self, config: &BucketConfig) -> Result<LogContext> {
        config
            .context()
            .ok_or_else(|| AllocatorError::UnknownTable(config.table.clone()))
    }
}
