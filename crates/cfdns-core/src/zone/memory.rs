// # Memory Zone API
//
// In-memory implementation of ZoneApi.
//
// ## Purpose
//
// Holds a single zone and its TXT records in insertion order, the order a
// remote system reports them in. Useful for tests and for exercising the
// upserter without network access.
//
// ## Behavior
//
// - Record IDs are assigned sequentially (`rec-1`, `rec-2`, ...)
// - Names passed to create/update are qualified the way the remote system
//   does it: `"@"` becomes the zone name, bare labels get the zone appended,
//   names already under the zone are kept
// - An unknown zone or record ID yields a 404 status error
// - No deduplication: creating the same name twice yields two records

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::traits::zone_api::{TxtRecord, Zone, ZoneApi};

#[derive(Debug)]
struct Inner {
    zone: Zone,
    records: Vec<TxtRecord>,
    next_id: u64,
}

/// In-memory zone API implementation
///
/// Clones share the same underlying zone, so a test can hand one clone to the
/// upserter and inspect the records through another.
///
/// # Example
///
/// ```rust,no_run
/// use cfdns_core::zone::MemoryZoneApi;
/// use cfdns_core::traits::ZoneApi;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api = MemoryZoneApi::new("zone-1", "example.com");
///
///     api.create_txt_record("zone-1", "_acme", "token").await?;
///
///     let records = api.list_txt_records("zone-1", "_acme.example.com").await?;
///     assert_eq!(records.len(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryZoneApi {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryZoneApi {
    /// Create an empty zone
    pub fn new(zone_id: impl Into<String>, zone_name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                zone: Zone {
                    id: zone_id.into(),
                    name: zone_name.into(),
                },
                records: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Seed a record with a caller-chosen ID
    ///
    /// `name` is qualified the same way `create_txt_record` qualifies it.
    pub async fn insert_record(
        &self,
        id: impl Into<String>,
        name: &str,
        content: impl Into<String>,
    ) -> TxtRecord {
        let mut inner = self.inner.write().await;
        let record = TxtRecord {
            id: id.into(),
            name: qualify(name, &inner.zone.name),
            content: content.into(),
        };
        inner.records.push(record.clone());
        record
    }

    /// Snapshot of all records in insertion order
    pub async fn records(&self) -> Vec<TxtRecord> {
        self.inner.read().await.records.clone()
    }

    /// Get the number of records in the zone
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Check if the zone has no records
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}

/// Qualify a record name relative to `zone_name`
fn qualify(name: &str, zone_name: &str) -> String {
    if name == "@" || name == zone_name {
        return zone_name.to_string();
    }

    if name
        .strip_suffix(zone_name)
        .is_some_and(|label| label.ends_with('.'))
    {
        return name.to_string();
    }

    format!("{}.{}", name, zone_name)
}

fn zone_not_found(zone_id: &str) -> ApiError {
    ApiError::status(404, format!("zone not found: {}", zone_id))
}

fn check_zone(inner: &Inner, zone_id: &str) -> Result<(), ApiError> {
    if inner.zone.id != zone_id {
        return Err(zone_not_found(zone_id));
    }
    Ok(())
}

#[async_trait]
impl ZoneApi for MemoryZoneApi {
    async fn get_zone(&self, zone_id: &str) -> Result<Zone, ApiError> {
        let inner = self.inner.read().await;
        check_zone(&inner, zone_id)?;
        Ok(inner.zone.clone())
    }

    async fn list_txt_records(
        &self,
        zone_id: &str,
        fqdn: &str,
    ) -> Result<Vec<TxtRecord>, ApiError> {
        let inner = self.inner.read().await;
        check_zone(&inner, zone_id)?;

        Ok(inner
            .records
            .iter()
            .filter(|record| record.name == fqdn)
            .cloned()
            .collect())
    }

    async fn create_txt_record(
        &self,
        zone_id: &str,
        name: &str,
        content: &str,
    ) -> Result<TxtRecord, ApiError> {
        let mut inner = self.inner.write().await;
        check_zone(&inner, zone_id)?;

        let record = TxtRecord {
            id: format!("rec-{}", inner.next_id),
            name: qualify(name, &inner.zone.name),
            content: content.to_string(),
        };
        inner.next_id += 1;
        inner.records.push(record.clone());

        tracing::trace!("memory zone: created {} ({})", record.name, record.id);
        Ok(record)
    }

    async fn update_txt_record(
        &self,
        zone_id: &str,
        record_id: &str,
        name: &str,
        content: &str,
    ) -> Result<TxtRecord, ApiError> {
        let mut inner = self.inner.write().await;
        check_zone(&inner, zone_id)?;

        let fqdn = qualify(name, &inner.zone.name);
        let record = inner
            .records
            .iter_mut()
            .find(|record| record.id == record_id)
            .ok_or_else(|| ApiError::status(404, format!("record not found: {}", record_id)))?;

        record.name = fqdn;
        record.content = content.to_string();

        tracing::trace!("memory zone: updated {} ({})", record.name, record.id);
        Ok(record.clone())
    }
}
