//! End-to-end tests for the vector store against a live Azure AI Search service.
//!
//! Credentials are read from .env.local or the environment:
//! AZURE_SEARCH_ENDPOINT=<https://name.search.windows.net>
//! AZURE_SEARCH_API_KEY=<admin key>
//!
//! Run with: cargo test --package azure-vector-store-rs --features e2e --test store_e2e

#![cfg(feature = "e2e")]

use std::fs;
use std::time::Duration;

use azure_vector_store_rs::prelude::*;
use serde_json::json;

fn read_setting(name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for path in &[".env.local", "../../.env.local", "../../../.env.local"] {
        if let Ok(contents) = fs::read_to_string(path) {
            if let Some(value) = contents.lines().find_map(|l| l.strip_prefix(&prefix)) {
                return Some(value.trim().to_string());
            }
        }
    }
    std::env::var(name).ok()
}

fn test_store() -> Option<AzureVectorStore> {
    let config = AzureVectorStoreConfig::new(
        read_setting("AZURE_SEARCH_ENDPOINT")?,
        read_setting("AZURE_SEARCH_API_KEY")?,
    );
    Some(AzureVectorStore::from_config(&config).unwrap())
}

/// Polls until the query returns at least `expected` hits.
async fn query_until(
    store: &AzureVectorStore,
    params: QueryParams<AzureQueryOptions>,
    expected: usize,
) -> Vec<QueryResult> {
    let mut hits = Vec::new();
    for _ in 0..30 {
        hits = store.query(params.clone()).await.unwrap();
        if hits.len() >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    hits
}

#[tokio::test]
async fn test_upsert_query_delete_roundtrip() {
    let Some(store) = test_store() else {
        eprintln!("Skipping e2e test: no search credentials found");
        return;
    };

    let index = format!("e2e-store-{}", uuid::Uuid::new_v4().simple());
    let options = AzureIndexOptions {
        filterable_fields: vec![FieldSpec::new("category", FieldType::String)],
        ..Default::default()
    };
    store
        .create_index(CreateIndexParams::new(&index, 3).options(options.clone()))
        .await
        .unwrap();
    // Second create is a no-op.
    store
        .create_index(CreateIndexParams::new(&index, 3).options(options))
        .await
        .unwrap();

    let metadata = |category: &str| match json!({"category": category, "text": category}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    let ids = store
        .upsert(
            UpsertParams::new(&index, vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]])
                .ids(["a", "b"])
                .metadata(vec![metadata("books"), metadata("music")]),
        )
        .await
        .unwrap();
    assert_eq!(ids, ["a", "b"]);

    let hits = query_until(&store, QueryParams::new(&index, vec![1.0, 0.0, 0.0]).top_k(1), 1).await;
    assert_eq!(hits[0].id, "a");

    let filtered = query_until(
        &store,
        QueryParams::new(&index, vec![1.0, 0.0, 0.0])
            .top_k(2)
            .filter(FilterExpression::eq("category", "music")),
        1,
    )
    .await;
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "b");

    let err = store
        .upsert(UpsertParams::new(&index, vec![vec![1.0, 0.0]]))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::User);

    for _ in 0..2 {
        store
            .delete_vector(DeleteVectorParams {
                index_name: index.clone(),
                id: "a".to_string(),
            })
            .await
            .unwrap();
    }

    let stats = store.describe_index(&index).await.unwrap();
    assert_eq!(stats.dimension, 3);
    assert_eq!(stats.metric, Metric::Cosine);

    store.delete_index(&index).await.unwrap();
}
