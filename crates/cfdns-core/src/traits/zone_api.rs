// # Zone API Trait
//
// Defines the minimal capability the upserter needs from a remote
// DNS-zone management service.
//
// ## Implementations
//
// - Cloudflare: `cfdns-provider-cloudflare` crate
// - In-memory: `cfdns_core::zone::MemoryZoneApi`
//
// ## Usage
//
// ```rust,ignore
// use cfdns_core::traits::ZoneApi;
//
// let zone = api.get_zone("023e105f4ecef8ad9ca31a8372d0c353").await?;
// let records = api
//     .list_txt_records(&zone.id, &format!("_acme.{}", zone.name))
//     .await?;
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Zone metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Opaque zone identifier
    pub id: String,
    /// Root domain name of the zone (e.g. "example.com")
    pub name: String,
}

/// A TXT record as reported by the remote system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxtRecord {
    /// Opaque record identifier assigned by the remote system
    pub id: String,
    /// Fully-qualified record name
    pub name: String,
    /// Text content
    pub content: String,
}

/// Remote DNS-zone management capability
///
/// Each method is a single request/response exchange. Implementations must
/// not retry, cache or spawn tasks; the upserter decides what happens next.
///
/// # Names
///
/// - `list_txt_records` takes the fully-qualified name and matches it exactly
/// - `create_txt_record` and `update_txt_record` take the name as supplied by
///   the caller (a bare label or `"@"`); the remote system qualifies it
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// Fetch zone metadata by ID
    async fn get_zone(&self, zone_id: &str) -> Result<Zone, ApiError>;

    /// List TXT records in the zone whose name equals `fqdn`
    ///
    /// Returns records in the order the remote system reports them, possibly
    /// empty.
    async fn list_txt_records(&self, zone_id: &str, fqdn: &str)
    -> Result<Vec<TxtRecord>, ApiError>;

    /// Create a new TXT record
    async fn create_txt_record(
        &self,
        zone_id: &str,
        name: &str,
        content: &str,
    ) -> Result<TxtRecord, ApiError>;

    /// Replace name and content of an existing TXT record
    async fn update_txt_record(
        &self,
        zone_id: &str,
        record_id: &str,
        name: &str,
        content: &str,
    ) -> Result<TxtRecord, ApiError>;
}
