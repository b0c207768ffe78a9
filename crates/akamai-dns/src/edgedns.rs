// # Edge DNS API Client
//
// HTTP implementation of `DnsClient` against the Edge DNS management API
// (config-dns v2), authenticated with EdgeGrid signatures.
//
// ## Behavior
//
// - One HTTP request per trait call; no retry, no backoff (owned by the host)
// - HTTP timeout configured (30 seconds)
// - Status codes mapped to typed errors (401/403, 404, 409, 429, 5xx)
// - Successful GETs may be memoized in an optional `ResponseCache`; every
//   write invalidates the cached entry for the written record
//
// ## Security Requirements
//
// - Credentials NEVER appear in logs or Debug output
//
// ## API Reference
//
// - Get record:    GET    `/config-dns/v2/zones/{zone}/names/{name}/types/{type}`
// - Create record: POST   `/config-dns/v2/zones/{zone}/names/{name}/types/{type}`
// - Update record: PUT    `/config-dns/v2/zones/{zone}/names/{name}/types/{type}`
// - Delete record: DELETE `/config-dns/v2/zones/{zone}/names/{name}/types/{type}`

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use akamai_core::registry::ProviderRegistry;
use akamai_core::{EdgeGridCredentials, Error, ResponseCache, Result};

use crate::client::DnsClient;
use crate::edgegrid::EdgeGridSigner;
use crate::model::{RecordBody, RecordType};

/// Base path of the Edge DNS API
const CONFIG_DNS_BASE_PATH: &str = "/config-dns/v2";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Edge DNS API client
pub struct EdgeDnsClient {
    /// Scheme and host requests are sent to
    base_url: String,

    /// Request signer holding the credentials
    /// ⚠️ NEVER log its contents
    signer: EdgeGridSigner,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Optional GET response memoization
    cache: Option<Arc<dyn ResponseCache>>,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for EdgeDnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeDnsClient")
            .field("base_url", &self.base_url)
            .field("credentials", &"<REDACTED>")
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

impl EdgeDnsClient {
    /// Create a client for the host named in the credentials
    ///
    /// # Parameters
    ///
    /// - `credentials`: EdgeGrid credentials from an edgerc section
    /// - `cache`: Optional response cache shared with other clients
    pub fn new(
        credentials: EdgeGridCredentials,
        cache: Option<Arc<dyn ResponseCache>>,
    ) -> Result<Self> {
        if credentials.host.is_empty() {
            return Err(Error::config("EdgeGrid host cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(ProviderRegistry::user_agent(""))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: format!("https://{}", credentials.host),
            signer: EdgeGridSigner::new(credentials),
            client,
            cache,
        })
    }

    /// Send requests to a different scheme and host (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Path of a record in the API
    fn record_path(zone: &str, name: &str, record_type: RecordType) -> String {
        format!(
            "{}/zones/{}/names/{}/types/{}",
            CONFIG_DNS_BASE_PATH, zone, name, record_type
        )
    }

    /// Cache key of a GET request
    fn cache_key(path: &str) -> String {
        format!("GET {}", path)
    }

    /// Sign and send one request
    ///
    /// Non-success statuses are mapped to typed errors.
    async fn send(&self, method: Method, path: &str, body: Option<&RecordBody>) -> Result<reqwest::Response> {
        let url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| Error::config(format!("Invalid request URL {}: {}", path, e)))?;

        let payload = match body {
            Some(record) => serde_json::to_vec(record)?,
            None => Vec::new(),
        };
        let authorization = self.signer.sign(method.as_str(), &url, &payload)?;

        tracing::debug!("{} {}", method, path);

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json");
        if body.is_some() {
            request = request.header(CONTENT_TYPE, "application/json").body(payload);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        Err(map_status(status, &problem_detail(&error_text), &format!("{} {}", method, path)))
    }

    /// Send a write and drop any cached copy of the record
    async fn write(&self, method: Method, record: &RecordBody, zone: &str) -> Result<()> {
        let path = Self::record_path(zone, &record.name, record.record_type);
        let result = self.send(method, &path, Some(record)).await;

        if let Some(cache) = &self.cache {
            cache.invalidate(&Self::cache_key(&path)).await;
        }

        result.map(|_| ())
    }
}

/// Map an unsuccessful HTTP status to an error
fn map_status(status: u16, detail: &str, request: &str) -> Error {
    match status {
        401 | 403 => Error::auth(format!(
            "Invalid credentials or insufficient permissions. Status: {} ({})",
            status, detail
        )),
        404 => Error::not_found(format!("{}: {}", request, detail)),
        409 => Error::remote(status, format!("Conflict: {}", detail)),
        429 => Error::rate_limited(format!("Rate limit exceeded. Please retry later. ({})", detail)),
        500..=599 => Error::remote(status, format!("Edge DNS server error (transient): {}", detail)),
        _ => Error::remote(status, format!("{} failed: {}", request, detail)),
    }
}

/// Extract the human readable part of an API problem document
///
/// Falls back to the raw body when it is not a problem document.
fn problem_detail(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("detail").or_else(|| v.get("title")))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl DnsClient for EdgeDnsClient {
    async fn get_record(&self, zone: &str, name: &str, record_type: RecordType) -> Result<RecordBody> {
        let path = Self::record_path(zone, name, record_type);
        let key = Self::cache_key(&path);

        if let Some(cache) = &self.cache
            && let Some(cached) = cache.get(&key).await
        {
            tracing::debug!("Cache hit: {}", key);
            return Ok(serde_json::from_value(cached)?);
        }

        let response = self.send(Method::GET, &path, None).await?;
        let json: Value = response
            .json()
            .await
            .map_err(|e| Error::http(format!("Failed to parse response: {}", e)))?;

        let record: RecordBody = serde_json::from_value(json.clone())?;

        if let Some(cache) = &self.cache {
            cache.set(&key, json).await;
        }

        Ok(record)
    }

    async fn create_record(&self, record: &RecordBody, zone: &str) -> Result<()> {
        tracing::info!("Creating {} record {} in zone {}", record.record_type, record.name, zone);
        self.write(Method::POST, record, zone).await
    }

    async fn update_record(&self, record: &RecordBody, zone: &str) -> Result<()> {
        tracing::info!("Updating {} record {} in zone {}", record.record_type, record.name, zone);
        self.write(Method::PUT, record, zone).await
    }

    async fn delete_record(&self, record: &RecordBody, zone: &str) -> Result<()> {
        tracing::info!("Deleting {} record {} in zone {}", record.record_type, record.name, zone);
        let path = Self::record_path(zone, &record.name, record.record_type);
        let result = self.send(Method::DELETE, &path, None).await;

        if let Some(cache) = &self.cache {
            cache.invalidate(&Self::cache_key(&path)).await;
        }

        result.map(|_| ())
    }

    fn client_name(&self) -> &'static str {
        "edgedns"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akamai_core::MemoryResponseCache;

    fn credentials() -> EdgeGridCredentials {
        EdgeGridCredentials {
            host: "akab-host.luna.akamaiapis.net".to_string(),
            client_token: "akab-client".to_string(),
            client_secret: "secret_value_12345".to_string(),
            access_token: "akab-access".to_string(),
            max_body: 131_072,
        }
    }

    #[test]
    fn test_record_path() {
        assert_eq!(
            EdgeDnsClient::record_path("example.com", "www.example.com", RecordType::Aaaa),
            "/config-dns/v2/zones/example.com/names/www.example.com/types/AAAA"
        );
    }

    #[test]
    fn test_empty_host_rejected() {
        let mut creds = credentials();
        creds.host = String::new();
        assert!(EdgeDnsClient::new(creds, None).is_err());
    }

    #[test]
    fn test_credentials_not_exposed_in_debug() {
        let client = EdgeDnsClient::new(credentials(), None).unwrap();
        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("secret_value_12345"));
        assert!(!debug_str.contains("akab-access"));
        assert!(debug_str.contains("EdgeDnsClient"));
    }

    #[test]
    fn test_with_base_url() {
        let client = EdgeDnsClient::new(credentials(), None)
            .unwrap()
            .with_base_url("http://127.0.0.1:8080/");
        assert_eq!(client.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(map_status(401, "", "GET /x"), Error::Authentication(_)));
        assert!(map_status(404, "", "GET /x").is_not_found());
        assert!(matches!(map_status(429, "", "GET /x"), Error::RateLimited(_)));
        assert!(map_status(503, "", "GET /x").is_transient());
        assert!(matches!(map_status(400, "", "GET /x"), Error::Remote { status: 400, .. }));
    }

    #[test]
    fn test_problem_detail() {
        let body = r#"{"type":"/errors/not-found","title":"Not Found","detail":"Record not found","status":404}"#;
        assert_eq!(problem_detail(body), "Record not found");
        assert_eq!(problem_detail(r#"{"title":"Bad Request"}"#), "Bad Request");
        assert_eq!(problem_detail(" plain text "), "plain text");
    }

    #[tokio::test]
    async fn test_cached_get_skips_network() {
        let cache = Arc::new(MemoryResponseCache::default());
        // Unroutable base URL: any network attempt fails
        let client = EdgeDnsClient::new(
            credentials(),
            Some(cache.clone() as Arc<dyn ResponseCache>),
        )
        .unwrap()
        .with_base_url("http://127.0.0.1:9");

        let path = EdgeDnsClient::record_path("example.com", "www.example.com", RecordType::A);
        cache
            .set(
                &EdgeDnsClient::cache_key(&path),
                serde_json::json!({"name": "www.example.com", "type": "A", "ttl": 300, "rdata": ["10.0.0.1"]}),
            )
            .await;

        let record = client
            .get_record("example.com", "www.example.com", RecordType::A)
            .await
            .unwrap();
        assert_eq!(record.target, vec!["10.0.0.1".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_write_still_invalidates_cache() {
        let cache = Arc::new(MemoryResponseCache::default());
        let client = EdgeDnsClient::new(
            credentials(),
            Some(cache.clone() as Arc<dyn ResponseCache>),
        )
        .unwrap()
        .with_base_url("http://127.0.0.1:9");

        let path = EdgeDnsClient::record_path("example.com", "www.example.com", RecordType::A);
        let key = EdgeDnsClient::cache_key(&path);
        cache.set(&key, serde_json::json!({})).await;

        let record = RecordBody {
            name: "www.example.com".to_string(),
            record_type: RecordType::A,
            ttl: 300,
            active: true,
            target: vec!["10.0.0.2".to_string()],
        };
        let result = client.update_record(&record, "example.com").await;

        assert!(matches!(result, Err(Error::Http(_))));
        assert!(cache.get(&key).await.is_none());
    }
}
