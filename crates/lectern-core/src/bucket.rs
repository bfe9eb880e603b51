//! Bucket Identity and Pool State
//!
//! This module defines the three layers of bucket state:
//!
//! ### BucketIdentity
//! The durable, immutable record of a bucket: its time-ordered id, owning
//! table, and creation day/time. Identities are persisted once to the bucket
//! metadata store and never mutated or deleted by this subsystem.
//!
//! ### BucketInstance
//! An identity plus the mutable allocation state that lives only in the
//! shared cache: how many writes the bucket has consumed and its capacity.
//! A full instance is replaced wholesale (new identity, count reset to 1)
//! rather than incremented past capacity.
//!
//! ### AllocationCache
//! The whole-pool snapshot, one instance list per table, serialized as a
//! single shared cache entry. It is read, mutated, and written back as a
//! unit on every allocation; there is no partial update protocol. The cache
//! is a projection of which identities are currently active; the metadata
//! store, not the cache, is the source of truth for identity existence.
//!
//! ## Design Decisions
//!
//! - Bucket ids are UUIDv7 strings: time-ordered, so physical write
//!   partitions sort by creation time.
//! - Creation day is a calendar date (`NaiveDate`) because the metadata
//!   store partitions identity records by day.
//! - Timestamps are i64 milliseconds since epoch.
//! - `current_count` starts at 1, never 0: a bucket is only ever created by
//!   a write that needs it, and that write is already counted.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Named duration class governing how long a bucket's underlying log data
/// is kept. Enforcement happens outside this subsystem; the policy rides
/// along on each instance so downstream sweepers can read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetentionPolicy {
    Week,
    Fortnight,
    Month,
}

impl RetentionPolicy {
    /// Retention window in days.
    pub fn days(&self) -> u32 {
        match self {
            RetentionPolicy::Week => 7,
            RetentionPolicy::Fortnight => 14,
            RetentionPolicy::Month => 30,
        }
    }
}

/// The durable identity of a bucket.
///
/// Append-only: persisted to the bucket metadata store at mint time and
/// never touched again. Every identity that ever appears in an
/// [`AllocationCache`] has a corresponding durable record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketIdentity {
    /// Time-ordered unique id (UUIDv7), used as the physical write-partition
    /// key for log records routed to this bucket.
    pub bucket_id: String,

    /// Log table this bucket belongs to.
    pub table: String,

    /// Calendar day the bucket was created, used for metadata-store
    /// partitioning.
    pub creation_day: NaiveDate,

    /// Creation timestamp (milliseconds since Unix epoch).
    pub creation_time_ms: i64,
}

impl BucketIdentity {
    /// Mint a fresh identity for `table` stamped with the current day and
    /// time.
    pub fn mint(table: &str) -> Self {
        let now = Utc::now();
        Self {
            bucket_id: Uuid::now_v7().to_string(),
            table: table.to_string(),
            creation_day: now.date_naive(),
            creation_time_ms: now.timestamp_millis(),
        }
    }
}

/// A bucket identity plus its live allocation state.
///
/// Mutated in place by the allocator each time a write is routed through it;
/// replaced wholesale when it reaches capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketInstance {
    pub identity: BucketIdentity,

    /// Writes consumed so far. Starts at 1 because creation is triggered by
    /// the first write that needed the bucket.
    pub current_count: u32,

    /// Capacity, copied from the table's bucket config at creation time.
    pub max_record_count: u32,

    pub retention: RetentionPolicy,
}

impl BucketInstance {
    /// Wrap a freshly minted identity as an instance whose first write has
    /// already been consumed.
    pub fn first_write(
        identity: BucketIdentity,
        max_record_count: u32,
        retention: RetentionPolicy,
    ) -> Self {
        Self {
            identity,
            current_count: 1,
            max_record_count,
            retention,
        }
    }

    /// Whether another write fits without rotating the bucket.
    pub fn has_capacity(&self) -> bool {
        self.current_count < self.max_record_count
    }

    pub fn bucket_id(&self) -> &str {
        &self.identity.bucket_id
    }

    pub fn table(&self) -> &str {
        &self.identity.table
    }
}

/// The whole-pool snapshot shared between every process running this
/// subsystem: one fixed-length instance list per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationCache {
    pub pools: HashMap<String, Vec<BucketInstance>>,
}

impl AllocationCache {
    pub fn pool(&self, table: &str) -> Option<&[BucketInstance]> {
        self.pools.get(table).map(Vec::as_slice)
    }

    pub fn pool_mut(&mut self, table: &str) -> Option<&mut Vec<BucketInstance>> {
        self.pools.get_mut(table)
    }

    pub fn insert_pool(&mut self, table: &str, instances: Vec<BucketInstance>) {
        self.pools.insert(table.to_string(), instances);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GENERIC_LOG_TABLE;

    #[test]
    fn retention_day_classes() {
        assert_eq!(RetentionPolicy::Week.days(), 7);
        assert_eq!(RetentionPolicy::Fortnight.days(), 14);
        assert_eq!(RetentionPolicy::Month.days(), 30);
    }

    #[test]
    fn minted_identities_are_distinct_and_stamped() {
        let a = BucketIdentity::mint(GENERIC_LOG_TABLE);
        let b = BucketIdentity::mint(GENERIC_LOG_TABLE);

        assert_ne!(a.bucket_id, b.bucket_id);
        assert_eq!(a.table, GENERIC_LOG_TABLE);
        assert_eq!(a.creation_day, Utc::now().date_naive());
        assert!(a.creation_time_ms > 0);
    }

    #[test]
    fn first_write_consumes_one_slot() {
        let instance = BucketInstance::first_write(
            BucketIdentity::mint(GENERIC_LOG_TABLE),
            2,
            RetentionPolicy::Week,
        );

        assert_eq!(instance.current_count, 1);
        assert!(instance.has_capacity());
    }

    #[test]
    fn capacity_boundary_is_exclusive() {
        let mut instance = BucketInstance::first_write(
            BucketIdentity::mint(GENERIC_LOG_TABLE),
            2,
            RetentionPolicy::Week,
        );

        instance.current_count = 2;
        assert!(!instance.has_capacity());
    }

    #[test]
    fn cache_snapshot_round_trips_as_json() {
        let mut cache = AllocationCache::default();
        cache.insert_pool(
            GENERIC_LOG_TABLE,
            vec![BucketInstance::first_write(
                BucketIdentity::mint(GENERIC_LOG_TABLE),
                1000,
                RetentionPolicy::Month,
            )],
        );

        let json = serde_json::to_string(&cache).unwrap();
        let restored: AllocationCache = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cache);
    }
}
