//! Lectern Bucket Allocator
//!
//! Capacity-aware, round-robin write sharding for plugin log streams.
//!
//! ## What Problem Does This Solve?
//!
//! Plugin logs are the highest-volume writes in the platform, and a single
//! write-partition per log table turns into a hot partition under load.
//! This crate spreads those writes across a rotating pool of logical
//! buckets per table:
//!
//! - a fixed-size pool of bucket instances per log table,
//! - a per-context round-robin cursor that cycles through the pool,
//! - a capacity check that retires a full bucket and mints a replacement
//!   in its slot,
//! - a single shared cache entry holding the whole pool state, visible to
//!   every process,
//! - durable, append-only identity records in `lectern-metadata` for every
//!   bucket ever minted.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use lectern_allocator::{BucketAllocator, BucketConfig, MemoryCache};
//! use lectern_core::LogContext;
//! use lectern_metadata::SqliteBucketMetadataStore;
//!
//! let cache = Arc::new(MemoryCache::new());
//! let store = Arc::new(SqliteBucketMetadataStore::new("buckets.db").await?);
//! let allocator = BucketAllocator::new(cache, store, BucketConfig::default_set());
//!
//! // First call bootstraps the pools; every call returns the buckets the
//! // caller should address its physical writes to.
//! let instances = allocator.allocate(LogContext::Workspace).await?;
//! for instance in &instances {
//!     println!("write to {} / {}", instance.table(), instance.bucket_id());
//! }
//! ```

pub mod allocator;
pub mod cache;
pub mod config;
pub mod error;
pub mod initializer;
pub mod writer;

pub use allocator::BucketAllocator;
pub use cache::{MemoryCache, SharedCache, ALLOCATION_CACHE_KEY};
pub use config::BucketConfig;
pub use error::{AllocatorError, Result};
pub use initializer::BucketInitializer;
pub use writer::{LogStatementStore, MemoryStatementStore, StatementWriter};
