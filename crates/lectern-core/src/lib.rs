//! Lectern Core Types
//!
//! Shared data model for the plugin log storage layer: bucket identities,
//! bucket pool state, logging contexts, and the log statement variants that
//! get routed through them.
//!
//! ## The Bucket Model
//!
//! Plugin log writes are high-volume and would hammer a single partition if
//! they all shared one write key. Instead, each log table keeps a fixed-size
//! pool of **buckets** (logical write partitions, identified by time-ordered
//! ids). Writers spread records across the pool round-robin, and a bucket
//! that reaches its record capacity is replaced by a freshly minted one.
//!
//! ```text
//! generic_log_statement_by_plugin
//!   ┌──────────┬──────────┬──────────┐
//!   │ bucket 0 │ bucket 1 │ bucket 2 │   ← pool (fixed length)
//!   │ 412/1000 │ 398/1000 │ 405/1000 │   ← current / max record count
//!   └──────────┴──────────┴──────────┘
//!        ▲ full bucket is replaced in place, pool length never changes
//! ```
//!
//! The full pool state for every table lives in a single shared cache entry
//! ([`AllocationCache`]); the identity of every bucket ever created is
//! persisted durably by `lectern-metadata`.

pub mod bucket;
pub mod context;
pub mod statement;

pub use bucket::{AllocationCache, BucketIdentity, BucketInstance, RetentionPolicy};
pub use context::{
    LogContext, GENERIC_LOG_TABLE, LEARNSPACE_LOG_TABLE, WORKSPACE_LOG_TABLE,
};
pub use statement::{LogLevel, LogStatement};
