//! Statement Writer
//!
//! The write-side consumer of the allocator: takes a [`LogStatement`],
//! resolves the bucket instances its context maps to, and appends the
//! record once per resolved table under that table's bucket id.
//!
//! The physical record store sits behind [`LogStatementStore`] so the
//! platform's column-family adapters can plug in; [`MemoryStatementStore`]
//! backs tests and single-node runs.

use crate::allocator::BucketAllocator;
use crate::error::Result;
use lectern_core::{BucketInstance, LogStatement};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Destination for physical log records, addressed by table and bucket id.
#[async_trait]
pub trait LogStatementStore: Send + Sync {
    async fn append(&self, table: &str, bucket_id: &str, statement: &LogStatement) -> Result<()>;
}

/// In-process statement store keyed by (table, bucket id).
#[derive(Default)]
pub struct MemoryStatementStore {
    rows: RwLock<HashMap<(String, String), Vec<LogStatement>>>,
}

impl MemoryStatementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records appended under one bucket of one table.
    pub async fn statements(&self, table: &str, bucket_id: &str) -> Vec<LogStatement> {
        self.rows
            .read()
            .await
            .get(&(table.to_string(), bucket_id.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Total records across every bucket.
    pub async fn total(&self) -> usize {
        self.rows.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl LogStatementStore for MemoryStatementStore {
    async fn append(&self, table: &str, bucket_id: &str, statement: &LogStatement) -> Result<()> {
        self.rows
            .write()
            .await
            .entry((table.to_string(), bucket_id.to_string()))
            .or_default()
            .push(statement.clone());
        Ok(())
    }
}

/// Routes log statements through the allocator into the statement store.
pub struct StatementWriter {
    allocator: Arc<BucketAllocator>,
    store: Arc<dyn LogStatementStore>,
}

impl StatementWriter {
    pub fn new(allocator: Arc<BucketAllocator>, store: Arc<dyn LogStatementStore>) -> Self {
        Self { allocator, store }
    }

    /// Allocate buckets for the statement's context and append the record
    /// to each resolved table under its bucket id. Returns the instances
    /// written through so callers can surface the physical write keys.
    ///
    /// A failed allocation propagates before anything is appended; the
    /// caller decides whether to drop the record or try again.
    pub async fn write(&self, statement: LogStatement) -> Result<Vec<BucketInstance>> {
        let instances = self.allocator.allocate(statement.context()).await?;

        for instance in &instances {
            self.store
                .append(instance.table(), instance.bucket_id(), &statement)
                .await?;
            tracing::debug!(
                table = %instance.table(),
                bucket_id = %instance.bucket_id(),
                plugin_id = %statement.plugin_id(),
                "appended log statement"
            );
        }

        Ok(instances)
    }
}
