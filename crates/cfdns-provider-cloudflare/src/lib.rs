// # Cloudflare Zone API
//
// This crate implements `cfdns_core::ZoneApi` against the Cloudflare API v4.
//
// ## Behavior
//
// - One HTTP request per trait call
// - No retry, backoff or rate-limit handling (errors go straight back)
// - HTTP timeout configured (30 seconds unless overridden)
// - Non-2xx responses become `ApiError::Status` with the HTTP status
// - Requests that never get a response become `ApiError::Transport`
//
// ## Security Requirements
//
// - API token NEVER appears in logs
// - An empty token is not rejected locally; Cloudflare answers 400/401/403
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - Zone Details: GET `/zones/:zone_id`
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=TXT&name=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use cfdns_core::config::DEFAULT_HTTP_TIMEOUT;
use cfdns_core::traits::{TxtRecord, Zone, ZoneApi};
use cfdns_core::{ApiError, UpserterConfig};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Cloudflare response envelope
#[derive(Debug, Deserialize)]
struct CloudflareResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<CloudflareMessage>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct CloudflareMessage {
    code: i64,
    message: String,
}

/// Body of create and update requests
#[derive(Debug, Serialize)]
struct TxtRecordParams<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    name: &'a str,
    content: &'a str,
}

impl<'a> TxtRecordParams<'a> {
    fn new(name: &'a str, content: &'a str) -> Self {
        Self {
            record_type: "TXT",
            name,
            content,
        }
    }
}

/// Cloudflare zone API client
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareZoneApi {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL, without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareZoneApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareZoneApi")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareZoneApi {
    /// Create a client for the public Cloudflare API
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:Read and DNS:Edit permissions
    pub fn new(api_token: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_base_url(api_token, CLOUDFLARE_API_BASE, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a client against a custom base URL
    ///
    /// Used for API-compatible endpoints and for tests against a mock server.
    pub fn with_base_url(
        api_token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::transport)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            api_token: api_token.into(),
            base_url,
            client,
        })
    }

    /// Create a client from the process configuration
    pub fn from_config(config: &UpserterConfig) -> Result<Self, ApiError> {
        Self::with_base_url(
            config.api_token.clone(),
            config
                .api_base
                .clone()
                .unwrap_or_else(|| CLOUDFLARE_API_BASE.to_string()),
            config.http_timeout,
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and unwrap the Cloudflare envelope
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(ApiError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(ApiError::status(
                status.as_u16(),
                describe_failure(status, &body),
            ));
        }

        let envelope: CloudflareResponse<T> =
            response.json().await.map_err(ApiError::transport)?;

        if !envelope.success {
            return Err(ApiError::status(
                status.as_u16(),
                join_messages(&envelope.errors)
                    .unwrap_or_else(|| "request unsuccessful".to_string()),
            ));
        }

        envelope
            .result
            .ok_or_else(|| ApiError::transport("Invalid response format: missing result"))
    }
}

/// Build the error message for a non-2xx response
fn describe_failure(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<CloudflareResponse<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| join_messages(&envelope.errors))
        .unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                status.canonical_reason().unwrap_or("no details").to_string()
            } else {
                body.to_string()
            }
        });

    match status.as_u16() {
        401 | 403 => format!(
            "Authentication failed: invalid API token or insufficient permissions ({})",
            detail
        ),
        429 => format!("Rate limit exceeded ({})", detail),
        500..=599 => format!("Cloudflare server error ({})", detail),
        _ => detail,
    }
}

fn join_messages(messages: &[CloudflareMessage]) -> Option<String> {
    if messages.is_empty() {
        return None;
    }

    Some(
        messages
            .iter()
            .map(|m| format!("{}: {}", m.code, m.message))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

#[async_trait]
impl ZoneApi for CloudflareZoneApi {
    /// ```http
    /// GET /zones/:zone_id
    /// Authorization: Bearer <token>
    /// ```
    async fn get_zone(&self, zone_id: &str) -> Result<Zone, ApiError> {
        tracing::debug!("Fetching zone {}", zone_id);

        let request = self.client.get(self.url(&format!("/zones/{}", zone_id)));
        let zone: Zone = self.send(request).await?;

        tracing::debug!("Zone {} is {}", zone.id, zone.name);
        Ok(zone)
    }

    /// ```http
    /// GET /zones/:zone_id/dns_records?type=TXT&name=sub.example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn list_txt_records(
        &self,
        zone_id: &str,
        fqdn: &str,
    ) -> Result<Vec<TxtRecord>, ApiError> {
        tracing::debug!("Listing TXT records named {}", fqdn);

        let request = self
            .client
            .get(self.url(&format!("/zones/{}/dns_records", zone_id)))
            .query(&[("type", "TXT"), ("name", fqdn)]);
        let records: Vec<TxtRecord> = self.send(request).await?;

        tracing::debug!("Found {} TXT record(s) named {}", records.len(), fqdn);
        Ok(records)
    }

    /// ```http
    /// POST /zones/:zone_id/dns_records
    /// { "type": "TXT", "name": "sub", "content": "..." }
    /// ```
    async fn create_txt_record(
        &self,
        zone_id: &str,
        name: &str,
        content: &str,
    ) -> Result<TxtRecord, ApiError> {
        tracing::debug!("Creating TXT record {}", name);

        let request = self
            .client
            .post(self.url(&format!("/zones/{}/dns_records", zone_id)))
            .json(&TxtRecordParams::new(name, content));

        self.send(request).await
    }

    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// { "type": "TXT", "name": "sub", "content": "..." }
    /// ```
    async fn update_txt_record(
        &self,
        zone_id: &str,
        record_id: &str,
        name: &str,
        content: &str,
    ) -> Result<TxtRecord, ApiError> {
        tracing::debug!("Updating TXT record {} ({})", name, record_id);

        let request = self
            .client
            .put(self.url(&format!("/zones/{}/dns_records/{}", zone_id, record_id)))
            .json(&TxtRecordParams::new(name, content));

        self.send(request).await
    }
}
