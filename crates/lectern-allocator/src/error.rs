//! Allocator Error Types
//!
//! ## Error Categories
//!
//! - `UnknownTable`: a table name outside the well-known log tables. A
//!   configuration error, surfaced immediately and never retried.
//! - `Cache`: the shared cache failed or held no snapshot when one was
//!   required.
//! - `Metadata`: persisting a bucket identity failed; a rotation that hits
//!   this surfaces as a failed allocation for that table rather than handing
//!   back a partially created instance.
//! - `Serialization`: the cache snapshot could not be encoded or decoded.
//!
//! The allocator never retries internally; callers decide whether to drop
//! the log record or retry the whole allocation.

use lectern_metadata::MetadataError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AllocatorError>;

#[derive(Debug, Error)]
pub enum AllocatorError {
    #[error("Unknown log table: {0}")]
    UnknownTable(String),

    #[error("Shared cache error: {0}")]
    Cache(String),

    #[error("Metadata store error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
