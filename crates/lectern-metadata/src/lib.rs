//! Lectern Bucket Metadata Store
//!
//! This crate tracks the identity of every log bucket ever allocated: which
//! table it belongs to, and the day and time it was created.
//!
//! ## Purpose
//!
//! The shared allocation cache only holds the *currently active* pool; when
//! a full bucket is rotated out, its identity disappears from the cache but
//! its log records still exist under that bucket id. The metadata store is
//! the durable ledger that lets audit and retention tooling answer "which
//! buckets were created on this day?" long after rotation.
//!
//! ## Write Model
//!
//! Append-only. Identities are persisted once at mint time and never
//! mutated or deleted by this subsystem (retention sweeps are an external
//! concern). The allocator never reads identities back, so read-your-writes
//! consistency is not required, only eventual visibility for the query
//! paths.
//!
//! ## Usage
//!
//! ```ignore
//! use lectern_metadata::{BucketMetadataStore, SqliteBucketMetadataStore};
//!
//! let store = SqliteBucketMetadataStore::new("buckets.db").await?;
//! store.put(&identity).await?;
//!
//! // Audit path: everything minted today, in creation order.
//! let today = chrono::Utc::now().date_naive();
//! let minted = store.query_by_day(today).await?;
//! ```

pub mod error;
pub mod store;

pub use error::{MetadataError, Result};
pub use store::SqliteBucketMetadataStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use lectern_core::BucketIdentity;

/// Durable record store for bucket identities.
///
/// Implementations must be `Send + Sync` so they can be shared across async
/// tasks via `Arc<dyn BucketMetadataStore>`.
#[async_trait]
pub trait BucketMetadataStore: Send + Sync {
    /// Persist a bucket identity. Idempotent: re-putting an identity that
    /// already exists is a no-op, never an overwrite.
    async fn put(&self, identity: &BucketIdentity) -> Result<()>;

    /// All identities created on `day`, ordered by creation time.
    async fn query_by_day(&self, day: NaiveDate) -> Result<Vec<BucketIdentity>>;

    /// Identities created on `day` strictly after `created_after_ms`,
    /// ordered by creation time.
    async fn query_by_day_and_time(
        &self,
        day: NaiveDate,
        created_after_ms: i64,
    ) -> Result<Vec<BucketIdentity>>;
}
