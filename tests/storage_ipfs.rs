//! Integration tests for content storage against a simulated IPFS HTTP API.

use biomint::config::StorageConfig;
use biomint::net::RetryPolicy;
use biomint::storage::{sha256_hex, Cid, ContentStorageClient, StorageError};
use biomint::Provenance;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_CID: &str = "bafkreihdwdcefgh4dqkjv67uzcmw7ojee6xedzdetojuzjevtenxquvyku";

fn config_for(server: &MockServer) -> StorageConfig {
    StorageConfig {
        api_url: Some(server.uri()),
        gateway_url: "https://gateway.test/".to_string(),
        timeout_secs: 5,
        allow_fallback: false,
        retry: RetryPolicy {
            max_retries: 2,
            base_delay_ms: 1,
            max_delay_ms: 5,
        },
        ..StorageConfig::default()
    }
}

fn add_response(hash: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!(
        "{}\n",
        json!({"Name": "blob", "Hash": hash, "Size": "12"})
    ))
}

#[tokio::test]
async fn test_store_and_retrieve_round_trip() {
    let server = MockServer::start().await;
    let payload = b"hello, world".to_vec();

    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .and(query_param("cid-version", "1"))
        .and(query_param("pin", "true"))
        .respond_with(add_response(TEST_CID))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v0/cat"))
        .and(query_param("arg", TEST_CID))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&server)
        .await;

    let client = ContentStorageClient::from_config(&config_for(&server)).unwrap();
    assert!(!client.is_fallback());

    let asset = client.store(&payload).await.unwrap();
    assert_eq!(asset.cid, Cid::Content(TEST_CID.to_string()));
    assert_eq!(asset.url, format!("https://gateway.test/ipfs/{}", TEST_CID));
    assert_eq!(asset.size, payload.len() as u64);
    assert_eq!(asset.digest, sha256_hex(&payload));
    assert_eq!(asset.provenance(), Provenance::Live);

    let fetched = client.retrieve(&asset.cid).await.unwrap();
    assert_eq!(fetched, payload);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(add_response(TEST_CID))
        .expect(1)
        .mount(&server)
        .await;

    let config = StorageConfig {
        token: Some("secret-token".to_string()),
        ..config_for(&server)
    };
    let client = ContentStorageClient::from_config(&config).unwrap();

    let asset = client.store(b"authorized").await.unwrap();
    assert_eq!(asset.cid.as_str(), TEST_CID);
}

#[tokio::test]
async fn test_missing_content_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/cat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "Message": "block was not found locally (offline): ipld: could not find bafy",
            "Code": 0,
            "Type": "error"
        })))
        .mount(&server)
        .await;

    let client = ContentStorageClient::from_config(&config_for(&server)).unwrap();
    let err = client
        .retrieve(&Cid::Content(TEST_CID.to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::NotFound { cid } if cid == TEST_CID));
}

#[tokio::test]
async fn test_upload_retries_transient_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .respond_with(add_response(TEST_CID))
        .with_priority(2)
        .mount(&server)
        .await;

    let client = ContentStorageClient::from_config(&config_for(&server)).unwrap();
    let asset = client.store(b"eventually").await.unwrap();

    assert_eq!(asset.cid.as_str(), TEST_CID);
}

#[tokio::test]
async fn test_upload_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let client = ContentStorageClient::from_config(&config_for(&server)).unwrap();
    let err = client.store(b"denied").await.unwrap_err();

    assert!(matches!(err, StorageError::Http { status: 401, .. }));
}

#[tokio::test]
async fn test_malformed_add_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = ContentStorageClient::from_config(&config_for(&server)).unwrap();
    let err = client.store(b"payload").await.unwrap_err();

    assert!(matches!(err, StorageError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_fallback_cid_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = ContentStorageClient::from_config(&config_for(&server)).unwrap();
    let err = client
        .retrieve(&Cid::fallback_for(b"local only"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::SyntheticCid { .. }));
}

#[tokio::test]
async fn test_unconfigured_storage_is_visibly_synthetic() {
    let client = ContentStorageClient::from_config(&StorageConfig::default()).unwrap();
    assert!(client.is_fallback());

    let asset = client.store(b"offline payload").await.unwrap();
    assert!(asset.cid.is_fallback());
    assert!(asset.is_synthetic());
    assert_eq!(client.retrieve(&asset.cid).await.unwrap(), b"offline payload");

    let missing = client.retrieve(&Cid::fallback_for(b"never stored")).await;
    assert!(matches!(missing, Err(StorageError::NotFound { .. })));
}
