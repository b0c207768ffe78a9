//! EdgeGrid request signing (`EG1-HMAC-SHA256`)
//!
//! Every API request carries an `Authorization` header computed from the
//! client credentials, a timestamp, a nonce and the request itself:
//!
//! ```text
//! signing_key  = base64(HMAC-SHA256(client_secret, timestamp))
//! content_hash = base64(SHA256(body[..max_body]))        (POST only)
//! data_to_sign = METHOD \t scheme \t host \t path?query \t \t content_hash \t auth_prefix
//! signature    = base64(HMAC-SHA256(signing_key, data_to_sign))
//! ```

use akamai_core::{EdgeGridCredentials, Error, Result};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Signs requests with EdgeGrid credentials
#[derive(Debug, Clone)]
pub struct EdgeGridSigner {
    credentials: EdgeGridCredentials,
}

impl EdgeGridSigner {
    /// Create a signer
    pub fn new(credentials: EdgeGridCredentials) -> Self {
        Self { credentials }
    }

    /// Compute the `Authorization` header for a request made now
    pub fn sign(&self, method: &str, url: &Url, body: &[u8]) -> Result<String> {
        let timestamp = timestamp(chrono::Utc::now());
        let nonce = uuid::Uuid::new_v4().to_string();
        self.sign_at(method, url, body, &timestamp, &nonce)
    }

    /// Compute the `Authorization` header for a fixed timestamp and nonce
    pub fn sign_at(
        &self,
        method: &str,
        url: &Url,
        body: &[u8],
        timestamp: &str,
        nonce: &str,
    ) -> Result<String> {
        let auth_prefix = format!(
            "EG1-HMAC-SHA256 client_token={};access_token={};timestamp={};nonce={};",
            self.credentials.client_token, self.credentials.access_token, timestamp, nonce
        );

        let host = url
            .host_str()
            .ok_or_else(|| Error::config(format!("request URL has no host: {}", url)))?;
        let path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let method = method.to_ascii_uppercase();
        let content_hash = content_hash(&method, body, self.credentials.max_body);

        let data_to_sign = [
            method.as_str(),
            url.scheme(),
            host,
            path.as_str(),
            "",
            content_hash.as_str(),
            auth_prefix.as_str(),
        ]
        .join("\t");

        let signing_key = hmac_base64(self.credentials.client_secret.as_bytes(), timestamp.as_bytes())?;
        let signature = hmac_base64(signing_key.as_bytes(), data_to_sign.as_bytes())?;

        Ok(format!("{}signature={}", auth_prefix, signature))
    }
}

/// EdgeGrid timestamp format (UTC, basic date with extended time)
pub fn timestamp(now: chrono::DateTime<chrono::Utc>) -> String {
    now.format("%Y%m%dT%H:%M:%S+0000").to_string()
}

fn content_hash(method: &str, body: &[u8], max_body: usize) -> String {
    if method != "POST" || body.is_empty() {
        return String::new();
    }
    let signed = &body[..body.len().min(max_body)];
    BASE64.encode(Sha256::digest(signed))
}

fn hmac_base64(key: &[u8], data: &[u8]) -> Result<String> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| Error::config(format!("invalid signing key: {}", e)))?;
    mac.update(data);
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
