//! Bucket Initializer
//!
//! Materializes brand-new bucket pools. Two entry points:
//!
//! - [`BucketInitializer::initialize`] builds the full pool set for a list
//!   of configs on first use (cold start).
//! - [`BucketInitializer::persist_one`] mints and persists a single new
//!   identity, used both during initialization and when the allocator
//!   rotates a full bucket mid-life.
//!
//! `persist_one` is the sole write path from this subsystem into the bucket
//! metadata store. A store failure aborts that instance's creation and
//! propagates, so a failed rotation surfaces to the caller as "no bucket
//! available this round" instead of a half-built instance.

use crate::config::BucketConfig;
use crate::error::Result;
use lectern_core::{AllocationCache, BucketIdentity, BucketInstance};
use lectern_metadata::BucketMetadataStore;
use std::sync::Arc;

pub struct BucketInitializer {
    store: Arc<dyn BucketMetadataStore>,
}

impl BucketInitializer {
    pub fn new(store: Arc<dyn BucketMetadataStore>) -> Self {
        Self { store }
    }

    /// Build a fresh pool for every config, persisting each identity before
    /// it enters the returned snapshot.
    ///
    /// Every instance starts at `current_count = 1`: initialization only
    /// ever runs on behalf of the first write that needed a bucket, and that
    /// write is already counted.
    pub async fn initialize(&self, configs: &[BucketConfig]) -> Result<AllocationCache> {
        let mut cache = AllocationCache::default();

        for config in configs {
            let mut pool = Vec::with_capacity(config.pool_size as usize);

            for _ in 0..config.pool_size {
                let identity = self.persist_one(config).await?;
                pool.push(BucketInstance::first_write(
                    identity,
                    config.max_record_count,
                    config.retention,
                ));
            }

            tracing::info!(
                table = %config.table,
                pool_size = config.pool_size,
                "initialized bucket pool"
            );

            cache.insert_pool(&config.table, pool);
        }

        Ok(cache)
    }

    /// Mint a time-ordered identity for `config`'s table and persist it.
    pub async fn persist_one(&self, config: &BucketConfig) -> Result<BucketIdentity> {
        let identity = BucketIdentity::mint(&config.table);

        if let Err(e) = self.store.put(&identity).await {
            tracing::error!(
                table = %identity.table,
                day = %identity.creation_day,
                time_ms = identity.creation_time_ms,
                error = %e,
                "failed to persist bucket identity"
            );
            return Err(e.into());
        }

        tracing::debug!(
            bucket_id = %identity.bucket_id,
            table = %identity.table,
            "minted bucket identity"
        );

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::{RetentionPolicy, GENERIC_LOG_TABLE, WORKSPACE_LOG_TABLE};
    use lectern_metadata::SqliteBucketMetadataStore;

    fn config(table: &str, pool_size: u32) -> BucketConfig {
        BucketConfig {
            table: table.to_string(),
            max_record_count: 100,
            pool_size,
            retention: RetentionPolicy::Week,
        }
    }

    #[tokio::test]
    async fn initialize_builds_one_pool_per_config() {
        let store = Arc::new(SqliteBucketMetadataStore::new_in_memory().await.unwrap());
        let initializer = BucketInitializer::new(store);

        let cache = initializer
            .initialize(&[config(GENERIC_LOG_TABLE, 3), config(WORKSPACE_LOG_TABLE, 2)])
            .await
            .unwrap();

        assert_eq!(cache.pool(GENERIC_LOG_TABLE).unwrap().len(), 3);
        assert_eq!(cache.pool(WORKSPACE_LOG_TABLE).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn initialized_instances_start_with_one_write_consumed() {
        let store = Arc::new(SqliteBucketMetadataStore::new_in_memory().await.unwrap());
        let initializer = BucketInitializer::new(store);

        let cache = initializer
            .initialize(&[config(GENERIC_LOG_TABLE, 2)])
            .await
            .unwrap();

        for instance in cache.pool(GENERIC_LOG_TABLE).unwrap() {
            assert_eq!(instance.current_count, 1);
            assert_eq!(instance.max_record_count, 100);
            assert_eq!(instance.retention, RetentionPolicy::Week);
        }
    }

    #[tokio::test]
    async fn every_initialized_identity_is_durably_persisted() {
        let store = Arc::new(SqliteBucketMetadataStore::new_in_memory().await.unwrap());
        let initializer = BucketInitializer::new(Arc::clone(&store) as Arc<dyn BucketMetadataStore>);

        let cache = initializer
            .initialize(&[config(GENERIC_LOG_TABLE, 3)])
            .await
            .unwrap();

        let today = chrono::Utc::now().date_naive();
        let persisted = store.query_by_day(today).await.unwrap();

        assert_eq!(persisted.len(), 3);
        for instance in cache.pool(GENERIC_LOG_TABLE).unwrap() {
            assert!(persisted.iter().any(|p| p.bucket_id == instance.bucket_id()));
        }
    }

    #[tokio::test]
    async fn persist_one_mints_distinct_identities_for_the_same_table() {
        let store = Arc::new(SqliteBucketMetadataStore::new_in_memory().await.unwrap());
        let initializer = BucketInitializer::new(store);

        let first = initializer
            .persist_one(&config(GENERIC_LOG_TABLE, 1))
            .await
            .unwrap();
        let second = initializer
            .persist_one(&config(GENERIC_LOG_TABLE, 1))
            .await
            .unwrap();

        assert_ne!(first.bucket_id, second.bucket_id);
        assert_eq!(first.table, GENERIC_LOG_TABLE);
        assert_eq!(first.creation_day, second.creation_day);
    }
}
