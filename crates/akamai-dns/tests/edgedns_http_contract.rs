//! Contract Test: Edge DNS HTTP Client
//!
//! Runs `EdgeDnsClient` against a local mock of the config-dns v2 API.
//!
//! Constraints verified:
//! - Every request carries an EdgeGrid `Authorization` header
//! - Writes send the record as JSON (`name`, `type`, `ttl`, `active`, `rdata`)
//! - 404 becomes `NotFound` for reads and deletes; a reconciler delete of a
//!   missing record still succeeds
//! - Problem documents surface their `detail`
//! - Successful GETs are served from the cache until a write invalidates them

use akamai_core::{EdgeGridCredentials, Error, MemoryResponseCache, ResponseCache};
use akamai_dns::{DnsClient, DnsRecordReconciler, EdgeDnsClient, RecordBody, RecordTriple, RecordType};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECORD_PATH: &str = "/config-dns/v2/zones/example.com/names/www.example.com/types/A";

fn credentials() -> EdgeGridCredentials {
    EdgeGridCredentials {
        host: "akab-host.luna.akamaiapis.net".to_string(),
        client_token: "akab-client".to_string(),
        client_secret: "c2VjcmV0".to_string(),
        access_token: "akab-access".to_string(),
        max_body: 131_072,
    }
}

fn client(server: &MockServer, cache: Option<Arc<dyn ResponseCache>>) -> EdgeDnsClient {
    EdgeDnsClient::new(credentials(), cache)
        .expect("client builds")
        .with_base_url(server.uri())
}

fn record(targets: &[&str]) -> RecordBody {
    RecordBody {
        name: "www.example.com".to_string(),
        record_type: RecordType::A,
        ttl: 300,
        active: true,
        target: targets.iter().map(|t| t.to_string()).collect(),
    }
}

fn wire(targets: &[&str]) -> serde_json::Value {
    json!({
        "name": "www.example.com",
        "type": "A",
        "ttl": 300,
        "active": true,
        "rdata": targets,
    })
}

#[tokio::test]
async fn get_sends_signed_request_and_decodes_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(RECORD_PATH))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wire(&["10.0.0.2"])))
        .expect(1)
        .mount(&server)
        .await;

    let found = client(&server, None)
        .get_record("example.com", "www.example.com", RecordType::A)
        .await
        .expect("record decodes");
    assert_eq!(found, record(&["10.0.0.2"]));

    let requests = server.received_requests().await.expect("recording enabled");
    let authorization = requests[0]
        .headers
        .get("authorization")
        .expect("Authorization header sent")
        .to_str()
        .unwrap();
    assert!(authorization.starts_with(
        "EG1-HMAC-SHA256 client_token=akab-client;access_token=akab-access;timestamp="
    ));
    assert!(authorization.contains(";signature="));
    assert!(!authorization.contains("c2VjcmV0"));
}

#[tokio::test]
async fn writes_send_record_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RECORD_PATH))
        .and(header("Content-Type", "application/json"))
        .and(body_json(wire(&["10.0.0.2", "10.0.0.3"])))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(RECORD_PATH))
        .and(body_json(wire(&["10.0.0.4"])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, None);
    client
        .create_record(&record(&["10.0.0.2", "10.0.0.3"]), "example.com")
        .await
        .expect("create succeeds");
    client
        .update_record(&record(&["10.0.0.4"]), "example.com")
        .await
        .expect("update succeeds");
}

#[tokio::test]
async fn missing_record_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_raw(
            r#"{"type": "https://problems.luna.akamaiapis.net/config-dns/v2/not-found", "title": "Not Found", "detail": "Record not found"}"#,
            "application/problem+json",
        ))
        .mount(&server)
        .await;

    let client = Arc::new(client(&server, None));

    let err = client
        .get_record("example.com", "www.example.com", RecordType::A)
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "got {:?}", err);

    let err = client
        .delete_record(&record(&[]), "example.com")
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "got {:?}", err);

    let reconciler = DnsRecordReconciler::new(client);
    reconciler
        .delete(&RecordTriple::new("example.com", "www.example.com", RecordType::A))
        .await
        .expect("deleting a missing record succeeds");
}

#[tokio::test]
async fn problem_detail_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_raw(
            r#"{"type": "https://problems.luna.akamaiapis.net/config-dns/v2/bad-request", "title": "Bad Request", "detail": "Invalid IP address 10.0.0.300"}"#,
            "application/problem+json",
        ))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .create_record(&record(&["10.0.0.300"]), "example.com")
        .await
        .unwrap_err();

    match err {
        Error::Remote { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("Invalid IP address 10.0.0.300"), "{}", message);
        }
        other => panic!("expected Remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn auth_and_rate_limit_statuses_are_typed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = client(&server, None);
    let err = client
        .get_record("example.com", "www.example.com", RecordType::A)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authentication(_)), "got {:?}", err);

    let err = client
        .delete_record(&record(&[]), "example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RateLimited(_)), "got {:?}", err);
    assert!(err.is_transient());
}

#[tokio::test]
async fn successful_get_fills_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(wire(&["10.0.0.2"])))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(MemoryResponseCache::default());
    let client = client(&server, Some(cache.clone() as Arc<dyn ResponseCache>));

    let first = client
        .get_record("example.com", "www.example.com", RecordType::A)
        .await
        .unwrap();
    let second = client
        .get_record("example.com", "www.example.com", RecordType::A)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(
        cache.get(&format!("GET {}", RECORD_PATH)).await,
        Some(wire(&["10.0.0.2"]))
    );
}

#[tokio::test]
async fn successful_write_invalidates_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(wire(&["10.0.0.2"])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(MemoryResponseCache::default());
    let client = client(&server, Some(cache.clone() as Arc<dyn ResponseCache>));

    client
        .get_record("example.com", "www.example.com", RecordType::A)
        .await
        .unwrap();
    client
        .update_record(&record(&["10.0.0.4"]), "example.com")
        .await
        .unwrap();
    assert!(cache.get(&format!("GET {}", RECORD_PATH)).await.is_none());

    // Goes back to the API
    client
        .get_record("example.com", "www.example.com", RecordType::A)
        .await
        .unwrap();
}
