//! Integration tests for the Azure vector store against a mock search service.

use azure_search_api_rs::client::{Credential, SearchClient};
use azure_vector_store_rs::prelude::*;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store(server: &MockServer) -> AzureVectorStore {
    let client = SearchClient::builder(server.uri(), Credential::ApiKey("admin-key".into()))
        .max_retries(0)
        .build()
        .unwrap();
    AzureVectorStore::new(client)
}

/// An index definition as the service returns it.
fn index_json(name: &str, vector_field: &str, dimensions: usize, metric: &str) -> Value {
    json!({
        "name": name,
        "fields": [
            {"name": "id", "type": "Edm.String", "key": true, "filterable": true},
            {"name": "content", "type": "Edm.String", "searchable": true},
            {"name": "metadata", "type": "Edm.String"},
            {"name": "category", "type": "Edm.String", "filterable": true},
            {
                "name": vector_field,
                "type": "Collection(Edm.Single)",
                "dimensions": dimensions,
                "vectorSearchProfile": "vector-profile"
            }
        ],
        "vectorSearch": {
            "algorithms": [{"name": "hnsw-config", "kind": "hnsw", "hnswParameters": {"metric": metric}}],
            "profiles": [{"name": "vector-profile", "algorithm": "hnsw-config"}]
        }
    })
}

async fn mount_index(server: &MockServer, name: &str, vector_field: &str, dimensions: usize) {
    Mock::given(method("GET"))
        .and(path(format!("/indexes/{name}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(index_json(name, vector_field, dimensions, "cosine")),
        )
        .mount(server)
        .await;
}

fn indexed(keys: &[&str]) -> Value {
    json!({
        "value": keys
            .iter()
            .map(|k| json!({"key": k, "status": true, "errorMessage": null, "statusCode": 201}))
            .collect::<Vec<_>>()
    })
}

fn meta(value: Value) -> Metadata {
    match value {
        Value::Object(map) => map,
        _ => panic!("metadata must be an object"),
    }
}

// ==================== create_index ====================

#[tokio::test]
async fn test_create_index_sends_layout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes"))
        .and(body_partial_json(json!({
            "name": "products",
            "fields": [
                {"name": "id", "key": true},
                {"name": "content", "searchable": true},
                {"name": "metadata"},
                {"name": "content_vector", "dimensions": 3, "vectorSearchProfile": "vector-profile"},
                {"name": "category", "type": "Edm.String", "filterable": true}
            ],
            "vectorSearch": {"algorithms": [{"hnswParameters": {"metric": "euclidean"}}]}
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(index_json("products", "content_vector", 3, "euclidean")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let options = AzureIndexOptions {
        filterable_fields: vec![FieldSpec::new("category", FieldType::String)],
        ..Default::default()
    };
    store(&server)
        .create_index(
            CreateIndexParams::new("products", 3)
                .metric(Metric::Euclidean)
                .options(options),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_existing_index_is_noop() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {"code": "ResourceNameAlreadyInUse", "message": "Index 'products' already exists."}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/indexes/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(index_json("products", "content_vector", 3, "cosine")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = store(&server)
        .create_index(CreateIndexParams::new("products", 3))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_create_existing_index_keeps_its_dimension() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {"message": "Index 'products' already exists."}
        })))
        .mount(&server)
        .await;
    mount_index(&server, "products", "content_vector", 3).await;
    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/index"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = store(&server);
    store
        .create_index(CreateIndexParams::new("products", 8))
        .await
        .unwrap();

    // Vectors are still checked against the dimension the index was created with.
    let err = store
        .upsert(UpsertParams::new("products", vec![vec![0.0; 8]]))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::User);
    assert_eq!(err.details().unwrap()["expected"], "3");
}

#[tokio::test]
async fn test_create_index_rejects_zero_dimension() {
    let server = MockServer::start().await;

    let err = store(&server)
        .create_index(CreateIndexParams::new("products", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, VectorStoreError::Validation { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ==================== upsert ====================

#[tokio::test]
async fn test_upsert_rejects_dimension_mismatch_before_upload() {
    let server = MockServer::start().await;
    mount_index(&server, "products", "content_vector", 3).await;

    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/index"))
        .respond_with(ResponseTemplate::new(200).set_body_json(indexed(&["a"])))
        .expect(0)
        .mount(&server)
        .await;

    let err = store(&server)
        .upsert(UpsertParams::new(
            "products",
            vec![vec![0.1, 0.2, 0.3], vec![0.1, 0.2]],
        ))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::User);
    let details = err.details().unwrap();
    assert_eq!(details["expected"], "3");
    assert_eq!(details["actual"], "2");
    assert_eq!(details["position"], "1");
}

#[tokio::test]
async fn test_upsert_then_query_finds_id() {
    let server = MockServer::start().await;
    mount_index(&server, "products", "content_vector", 3).await;

    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/index"))
        .and(body_partial_json(json!({
            "value": [{
                "@search.action": "mergeOrUpload",
                "id": "doc-1",
                "content_vector": [0.25, 0.5, 1.0],
                "content": "a guide",
                "category": "guides",
                "metadata": "{\"category\":\"guides\",\"text\":\"a guide\"}"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(indexed(&["doc-1"])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/search"))
        .and(body_partial_json(json!({
            "vectorQueries": [{"kind": "vector", "vector": [0.25, 0.5, 1.0], "k": 1, "fields": "content_vector"}],
            "top": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "@search.score": 1.0,
                "id": "doc-1",
                "content": "a guide",
                "metadata": "{\"category\":\"guides\",\"text\":\"a guide\"}"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store(&server);
    let ids = store
        .upsert(
            UpsertParams::new("products", vec![vec![0.25, 0.5, 1.0]])
                .ids(["doc-1"])
                .metadata(vec![meta(json!({"category": "guides", "text": "a guide"}))]),
        )
        .await
        .unwrap();
    assert_eq!(ids, ["doc-1"]);

    let hits = store
        .query(QueryParams::new("products", vec![0.25, 0.5, 1.0]).top_k(1))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "doc-1");
    assert_eq!(hits[0].document.as_deref(), Some("a guide"));
    assert_eq!(hits[0].metadata["category"], "guides");
}

#[tokio::test]
async fn test_upsert_generates_ids() {
    let server = MockServer::start().await;
    mount_index(&server, "products", "content_vector", 2).await;

    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/index"))
        .respond_with(ResponseTemplate::new(200).set_body_json(indexed(&["x", "y"])))
        .expect(1)
        .mount(&server)
        .await;

    let ids = store(&server)
        .upsert(UpsertParams::new("products", vec![vec![1.0, 0.0], vec![0.0, 1.0]]))
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert!(ids.iter().all(|id| id.len() == 36));
}

#[tokio::test]
async fn test_upsert_length_mismatch_is_rejected() {
    let server = MockServer::start().await;

    let err = store(&server)
        .upsert(UpsertParams::new("products", vec![vec![1.0]]).ids(["a", "b"]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ids length 2 does not match vector count 1"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upsert_partial_failure_is_aggregated() {
    let server = MockServer::start().await;
    mount_index(&server, "products", "content_vector", 1).await;

    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/index"))
        .respond_with(ResponseTemplate::new(207).set_body_json(json!({
            "value": [
                {"key": "a", "status": true, "errorMessage": null, "statusCode": 200},
                {"key": "b", "status": false, "errorMessage": "Document is too large", "statusCode": 400},
                {"key": "c", "status": false, "errorMessage": "Throttled", "statusCode": 503}
            ]
        })))
        .mount(&server)
        .await;

    let err = store(&server)
        .upsert(UpsertParams::new("products", vec![vec![1.0], vec![2.0], vec![3.0]]).ids(["a", "b", "c"]))
        .await
        .unwrap_err();

    match err {
        VectorStoreError::PartialUpload {
            operation,
            index_name,
            failed,
            total,
            first_key,
            first_message,
        } => {
            assert_eq!(operation, Operation::Upsert);
            assert_eq!(index_name, "products");
            assert_eq!((failed, total), (2, 3));
            assert_eq!(first_key, "b");
            assert_eq!(first_message, "Document is too large");
        }
        other => panic!("expected PartialUpload, got {other:?}"),
    }
}

#[tokio::test]
async fn test_upsert_reloads_schema_when_index_was_recreated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(index_json("products", "content_vector", 3, "cosine")),
        )
        .mount(&server)
        .await;
    // Recreated elsewhere with a larger dimension.
    mount_index(&server, "products", "content_vector", 4).await;
    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/index"))
        .respond_with(ResponseTemplate::new(200).set_body_json(indexed(&["a"])))
        .expect(1)
        .mount(&server)
        .await;

    let store = store(&server);
    store
        .create_index(CreateIndexParams::new("products", 3))
        .await
        .unwrap();

    let ids = store
        .upsert(UpsertParams::new("products", vec![vec![0.1, 0.2, 0.3, 0.4]]).ids(["a"]))
        .await
        .unwrap();
    assert_eq!(ids, ["a"]);

    // The reloaded dimension now applies.
    let err = store
        .upsert(UpsertParams::new("products", vec![vec![0.1, 0.2, 0.3]]))
        .await
        .unwrap_err();
    assert_eq!(err.details().unwrap()["expected"], "4");
}

// ==================== query ====================

#[tokio::test]
async fn test_query_translates_filter() {
    let server = MockServer::start().await;
    mount_index(&server, "products", "content_vector", 2).await;

    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/search"))
        .and(body_partial_json(json!({
            "filter": "(category eq 'books' and price gt 10)",
            "top": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .expect(1)
        .mount(&server)
        .await;

    let filter: FilterExpression = serde_json::from_value(json!({
        "and": [{"eq": {"category": "books"}}, {"gt": {"price": 10}}]
    }))
    .unwrap();
    let hits = store(&server)
        .query(QueryParams::new("products", vec![0.5, 0.5]).top_k(5).filter(filter))
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_query_passes_raw_filter_verbatim() {
    let server = MockServer::start().await;
    mount_index(&server, "products", "content_vector", 2).await;

    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/search"))
        .and(body_partial_json(json!({"filter": "tags/any(t: t eq 'sale')"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .expect(1)
        .mount(&server)
        .await;

    store(&server)
        .query(QueryParams::new("products", vec![0.5, 0.5]).filter("tags/any(t: t eq 'sale')"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_query_omits_empty_filter() {
    let server = MockServer::start().await;
    mount_index(&server, "products", "content_vector", 2).await;

    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .expect(1)
        .mount(&server)
        .await;

    store(&server)
        .query(QueryParams::new("products", vec![0.5, 0.5]).filter(FilterExpression::and(vec![])))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let search = requests
        .iter()
        .find(|r| r.url.path().ends_with("/docs/search"))
        .unwrap();
    let body: Value = serde_json::from_slice(&search.body).unwrap();
    assert!(body.get("filter").is_none());
}

#[tokio::test]
async fn test_query_uses_detected_vector_field() {
    let server = MockServer::start().await;
    mount_index(&server, "custom", "embedding", 2).await;

    Mock::given(method("POST"))
        .and(path("/indexes/custom/docs/search"))
        .and(body_partial_json(json!({"vectorQueries": [{"fields": "embedding"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .expect(1)
        .mount(&server)
        .await;

    store(&server)
        .query(QueryParams::new("custom", vec![0.5, 0.5]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_query_falls_back_to_default_vector_field() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/indexes/legacy"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"message": "Query keys cannot read index definitions."}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/indexes/legacy/docs/search"))
        .and(body_partial_json(json!({"vectorQueries": [{"fields": "content_vector"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .expect(1)
        .mount(&server)
        .await;

    store(&server)
        .query(QueryParams::new("legacy", vec![0.5, 0.5, 0.5]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_query_semantic_options() {
    let server = MockServer::start().await;
    mount_index(&server, "products", "content_vector", 2).await;

    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/search"))
        .and(body_partial_json(json!({
            "search": "jazz records",
            "queryType": "semantic",
            "semanticConfiguration": "default-semantic",
            "captions": "extractive",
            "select": "id,metadata,content",
            "vectorQueries": [{"exhaustive": true}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "@search.score": 0.03,
                "@search.rerankerScore": 2.9,
                "@search.captions": [{"text": "Jazz records from the 60s", "highlights": ""}],
                "id": "r-1",
                "content": "Jazz records",
                "metadata": "{}"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = AzureQueryOptions {
        query_text: Some("jazz records".to_string()),
        semantic_configuration: Some("default-semantic".to_string()),
        select: vec!["content".to_string()],
        exhaustive: true,
        ..Default::default()
    };
    let hits = store(&server)
        .query(QueryParams::new("products", vec![0.5, 0.5]).options(options))
        .await
        .unwrap();
    assert_eq!(hits[0].reranker_score, Some(2.9));
    assert_eq!(hits[0].captions, ["Jazz records from the 60s"]);
}

#[tokio::test]
async fn test_query_rejects_zero_top_k() {
    let server = MockServer::start().await;

    let err = store(&server)
        .query(QueryParams::new("products", vec![0.5]).top_k(0))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::User);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_query_service_error_is_categorized() {
    let server = MockServer::start().await;
    mount_index(&server, "products", "content_vector", 1).await;

    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "Invalid expression: Could not find a property named 'nope'."}
        })))
        .mount(&server)
        .await;

    let err = store(&server)
        .query(QueryParams::new("products", vec![1.0]).filter("nope eq 1"))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ThirdParty);
    assert_eq!(err.operation(), Some(Operation::Query));
    assert_eq!(err.details().unwrap()["filter"], "nope eq 1");
    assert!(err.to_string().contains("AZURE_VECTOR_QUERY_FAILED"));
}

#[tokio::test]
async fn test_query_service_error_drops_cached_schema() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/indexes/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(index_json("products", "content_vector", 1, "cosine")),
        )
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let store = store(&server);
    for _ in 0..2 {
        let err = store
            .query(QueryParams::new("products", vec![1.0]))
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ThirdParty);
    }
}

// ==================== update / delete ====================

#[tokio::test]
async fn test_update_vector_merges_changes() {
    let server = MockServer::start().await;
    mount_index(&server, "products", "content_vector", 2).await;

    Mock::given(method("GET"))
        .and(path("/indexes/products/docs/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "doc-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/index"))
        .and(body_partial_json(json!({
            "value": [{
                "@search.action": "merge",
                "id": "doc-1",
                "content_vector": [1.0, 0.0],
                "metadata": "{\"category\":\"archive\"}",
                "category": "archive"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(indexed(&["doc-1"])))
        .expect(1)
        .mount(&server)
        .await;

    store(&server)
        .update_vector(UpdateVectorParams {
            index_name: "products".to_string(),
            id: "doc-1".to_string(),
            update: VectorUpdate {
                vector: Some(vec![1.0, 0.0]),
                metadata: Some(meta(json!({"category": "archive"}))),
            },
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_missing_vector_fails() {
    let server = MockServer::start().await;
    mount_index(&server, "products", "content_vector", 2).await;

    Mock::given(method("GET"))
        .and(path("/indexes/products/docs/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/index"))
        .respond_with(ResponseTemplate::new(200).set_body_json(indexed(&["ghost"])))
        .expect(0)
        .mount(&server)
        .await;

    let err = store(&server)
        .update_vector(UpdateVectorParams {
            index_name: "products".to_string(),
            id: "ghost".to_string(),
            update: VectorUpdate {
                vector: None,
                metadata: Some(meta(json!({"a": 1}))),
            },
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("vector not found"));
}

#[tokio::test]
async fn test_delete_vector_is_idempotent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/products/docs/index"))
        .and(body_partial_json(json!({
            "value": [{"@search.action": "delete", "id": "gone"}]
        })))
        .respond_with(ResponseTemplate::new(207).set_body_json(json!({
            "value": [{"key": "gone", "status": false, "errorMessage": "Document not found.", "statusCode": 404}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let store = store(&server);
    for _ in 0..2 {
        store
            .delete_vector(DeleteVectorParams {
                index_name: "products".to_string(),
                id: "gone".to_string(),
            })
            .await
            .unwrap();
    }
}

// ==================== index management ====================

#[tokio::test]
async fn test_describe_index() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/indexes/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(index_json("products", "content_vector", 768, "dotProduct")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/indexes/products/docs/$count"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\u{feff}12"))
        .mount(&server)
        .await;

    let stats = store(&server).describe_index("products").await.unwrap();
    assert_eq!(
        stats,
        IndexStats {
            dimension: 768,
            count: 12,
            metric: Metric::DotProduct,
        }
    );
}

#[tokio::test]
async fn test_list_and_delete_indexes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"name": "alpha"}, {"name": "beta"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/indexes/alpha"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = store(&server);
    assert_eq!(store.list_indexes().await.unwrap(), ["alpha", "beta"]);
    store.delete_index("alpha").await.unwrap();
}

#[tokio::test]
async fn test_delete_missing_index_is_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/indexes/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "No index with the name 'nope' was found."}
        })))
        .mount(&server)
        .await;

    let err = store(&server).delete_index("nope").await.unwrap_err();
    assert!(matches!(
        err,
        VectorStoreError::Service { operation: Operation::DeleteIndex, .. }
    ));
    assert_eq!(err.details().unwrap()["indexName"], "nope");
}
