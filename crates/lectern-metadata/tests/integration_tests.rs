//! Integration tests for the bucket metadata store
//!
//! Exercised through `Arc<dyn BucketMetadataStore>` the way the allocator
//! holds it, so the trait-object path gets covered too.

use chrono::Utc;
use lectern_core::{BucketIdentity, GENERIC_LOG_TABLE, WORKSPACE_LOG_TABLE};
use lectern_metadata::{BucketMetadataStore, SqliteBucketMetadataStore};
use std::sync::Arc;

async fn setup_store() -> Arc<dyn BucketMetadataStore> {
    Arc::new(SqliteBucketMetadataStore::new_in_memory().await.unwrap())
}

#[tokio::test]
async fn full_mint_and_audit_workflow() {
    let store = setup_store().await;

    let generic = BucketIdentity::mint(GENERIC_LOG_TABLE);
    let workspace = BucketIdentity::mint(WORKSPACE_LOG_TABLE);

    store.put(&generic).await.unwrap();
    store.put(&workspace).await.unwrap();

    let today = Utc::now().date_naive();
    let minted = store.query_by_day(today).await.unwrap();

    assert_eq!(minted.len(), 2);
    assert!(minted.iter().any(|i| i.bucket_id == generic.bucket_id));
    assert!(minted.iter().any(|i| i.bucket_id == workspace.bucket_id));
}

#[tokio::test]
async fn day_and_time_query_narrows_the_audit_window() {
    let store = setup_store().await;
    let today = Utc::now().date_naive();

    let early = BucketIdentity {
        bucket_id: "bucket-early".to_string(),
        table: GENERIC_LOG_TABLE.to_string(),
        creation_day: today,
        creation_time_ms: 1_000,
    };
    let late = BucketIdentity {
        bucket_id: "bucket-late".to_string(),
        table: GENERIC_LOG_TABLE.to_string(),
        creation_day: today,
        creation_time_ms: 2_000,
    };

    store.put(&early).await.unwrap();
    store.put(&late).await.unwrap();

    let after = store.query_by_day_and_time(today, 1_000).await.unwrap();
    assert_eq!(after, vec![late]);

    let none = store.query_by_day_and_time(today, 2_000).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn concurrent_puts_from_shared_handle() {
    let store = setup_store().await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.put(&BucketIdentity::mint(GENERIC_LOG_TABLE)).await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let today = Utc::now().date_naive();
    assert_eq!(store.query_by_day(today).await.unwrap().len(), 8);
}
