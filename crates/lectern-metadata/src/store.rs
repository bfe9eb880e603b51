//! SQLite Bucket Metadata Store
//!
//! Single-table SQLite implementation of [`BucketMetadataStore`].
//!
//! ## Schema
//!
//! ```text
//! buckets (
//!     bucket_id        TEXT PRIMARY KEY,   -- UUIDv7, time-ordered
//!     table_name       TEXT NOT NULL,
//!     creation_day     TEXT NOT NULL,      -- ISO date, query partition key
//!     creation_time_ms INTEGER NOT NULL
//! )
//! index on (creation_day, creation_time_ms)
//! ```
//!
//! The schema is created on open. Days are stored as ISO-8601 text so the
//! day-partitioned queries stay index-friendly without a date type.
//!
//! ## Thread Safety
//!
//! The SQLx connection pool handles concurrent access; the store is
//! `Send + Sync` and safe to share via `Arc`.
//!
//! ## Testing
//!
//! `new_in_memory()` gives a fast, isolated database per test.

use crate::{
    error::{MetadataError, Result},
    BucketMetadataStore,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use lectern_core::BucketIdentity;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

const CREATE_BUCKETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS buckets (
    bucket_id        TEXT PRIMARY KEY,
    table_name       TEXT NOT NULL,
    creation_day     TEXT NOT NULL,
    creation_time_ms INTEGER NOT NULL
)
"#;

const CREATE_DAY_TIME_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_buckets_day_time
ON buckets (creation_day, creation_time_ms)
"#;

/// SQLite-backed bucket metadata store.
pub struct SqliteBucketMetadataStore {
    pool: SqlitePool,
}

impl SqliteBucketMetadataStore {
    /// Open (or create) a file-based store.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let options =
            SqliteConnectOptions::from_str(&format!("sqlite://{}", path.as_ref().display()))?
                .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await?;

        Self::create_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// In-memory database for tests.
    pub async fn new_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        Self::create_schema(&pool).await?;

        Ok(Self { pool })
    }

    async fn create_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(CREATE_BUCKETS_TABLE).execute(pool).await?;
        sqlx::query(CREATE_DAY_TIME_INDEX).execute(pool).await?;
        Ok(())
    }

    fn identity_from_row(
        (bucket_id, table, creation_day, creation_time_ms): (String, String, String, i64),
    ) -> Result<BucketIdentity> {
        let creation_day = NaiveDate::parse_from_str(&creation_day, "%Y-%m-%d")
            .map_err(|_| MetadataError::InvalidDay(creation_day))?;

        Ok(BucketIdentity {
            bucket_id,
            table,
            creation_day,
            creation_time_ms,
        })
    }
}

#[async_trait]
impl BucketMetadataStore for SqliteBucketMetadataStore {
    async fn put(&self, identity: &BucketIdentity) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO buckets (bucket_id, table_name, creation_day, creation_time_ms)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(bucket_id) DO NOTHING
            "#,
        )
        .bind(&identity.bucket_id)
        .bind(&identity.table)
        .bind(identity.creation_day.to_string())
        .bind(identity.creation_time_ms)
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            bucket_id = %identity.bucket_id,
            table = %identity.table,
            day = %identity.creation_day,
            "persisted bucket identity"
        );

        Ok(())
    }

    async fn query_by_day(&self, day: NaiveDate) -> Result<Vec<BucketIdentity>> {
        let rows: Vec<(String, String, String, i64)> = sqlx::query_as(
            r#"
            SELECT bucket_id, table_name, creation_day, creation_time_ms
            FROM buckets
            WHERE creation_day = ?
            ORDER BY creation_time_ms, bucket_id
            "#,
        )
        .bind(day.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::identity_from_row).collect()
    }

    async fn query_by_day_and_time(
        &self,
        day: NaiveDate,
        created_after_ms: i64,
    ) -> Result<Vec<BucketIdentity>> {
        let rows: Vec<(String, String, String, i64)> = sqlx::query_as(
            r#"
            SELECT bucket_id, table_name, creation_day, creation_time_ms
            FROM buckets
            WHERE creation_day = ? AND creation_time_ms > ?
            ORDER BY creation_time_ms, bucket_id
            "#,
        )
        .bind(day.to_string())
        .bind(created_after_ms)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::identity_from_row).collect()
    }
}
