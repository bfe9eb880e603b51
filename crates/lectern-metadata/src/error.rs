//! Metadata Error Types
//!
//! All bucket metadata operations return `Result<T>`, aliased to
//! `Result<T, MetadataError>`, so failures propagate with `?`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetadataError>;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid creation day in stored row: {0}")]
    InvalidDay(String),
}
