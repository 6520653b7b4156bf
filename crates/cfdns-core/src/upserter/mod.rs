//! TXT record upserter
//!
//! The [`TxtRecordUpserter`] makes sure exactly one TXT record with a given
//! name exists in a zone and carries a given value.
//!
//! ## Flow
//!
//! ```text
//! update_or_create(name, value)
//!         │
//!         ▼
//!       find ── get_zone ── list_txt_records(fqdn)
//!         │
//!         ├── NotFound ──────────► create(name, value)
//!         ├── other error ───────► returned unchanged
//!         └── Ok(record_id) ─────► update(record_id, name, value)
//! ```
//!
//! Every remote call is awaited to completion before the next one starts.
//! Nothing is cached: the zone name and the record ID are resolved again on
//! every call.
//!
//! ## Concurrency
//!
//! No locking is performed against the remote zone. Two concurrent upserts
//! of the same name may both observe NotFound and both create a record.
//! Callers needing stronger guarantees must serialize upserts themselves.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{Operation, Result, UpsertError};
use crate::traits::ZoneApi;

/// Record name denoting the zone root itself
pub const ZONE_ROOT: &str = "@";

/// Which path an upsert took
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record existed; a new one was created
    Created {
        /// ID assigned by the remote system
        record_id: String,
    },
    /// An existing record was updated in place
    Updated {
        /// ID of the updated record
        record_id: String,
    },
}

impl UpsertOutcome {
    /// ID of the record that now holds the value
    pub fn record_id(&self) -> &str {
        match self {
            UpsertOutcome::Created { record_id } | UpsertOutcome::Updated { record_id } => {
                record_id
            }
        }
    }
}

/// Build the fully-qualified name the remote system reports for `name`
///
/// `"@"` maps to the zone name verbatim; anything else is joined with it.
pub fn fully_qualified_name(name: &str, zone_name: &str) -> String {
    if name == ZONE_ROOT {
        zone_name.to_string()
    } else {
        format!("{}.{}", name, zone_name)
    }
}

/// Upserts a single TXT record in one zone
///
/// # Example
///
/// ```rust,no_run
/// use cfdns_core::TxtRecordUpserter;
/// use cfdns_core::zone::MemoryZoneApi;
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api = MemoryZoneApi::new("zone-1", "example.com");
///     let upserter = TxtRecordUpserter::new(Box::new(api), "zone-1");
///
///     let cancel = CancellationToken::new();
///     upserter.update_or_create("_acme", "token", &cancel).await?;
///
///     Ok(())
/// }
/// ```
pub struct TxtRecordUpserter {
    /// Remote zone API
    api: Box<dyn ZoneApi>,

    /// Target zone
    zone_id: String,
}

impl std::fmt::Debug for TxtRecordUpserter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxtRecordUpserter")
            .field("zone_id", &self.zone_id)
            .finish_non_exhaustive()
    }
}

impl TxtRecordUpserter {
    /// Create an upserter for `zone_id`
    ///
    /// The zone ID is not validated here; an invalid ID surfaces as an error
    /// from the first remote call.
    pub fn new(api: Box<dyn ZoneApi>, zone_id: impl Into<String>) -> Self {
        Self {
            api,
            zone_id: zone_id.into(),
        }
    }

    /// The target zone ID
    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    /// Create the TXT record `name` with content `value`, or update it if it
    /// already exists
    ///
    /// `name` is a label relative to the zone root, or `"@"` for the root
    /// itself.
    ///
    /// # Errors
    ///
    /// - [`UpsertError::Request`] / [`UpsertError::Api`]: the record lookup
    ///   failed; no create or update was attempted
    /// - [`UpsertError::Operation`]: the zone fetch, create or update failed
    /// - [`UpsertError::Cancelled`]: `cancel` fired before the sequence
    ///   completed
    ///
    /// [`UpsertError::NotFound`] is never returned.
    pub async fn update_or_create(
        &self,
        name: &str,
        value: &str,
        cancel: &CancellationToken,
    ) -> Result<UpsertOutcome> {
        match self.find(name, cancel).await {
            Ok(record_id) => {
                info!("TXT record {} exists ({}), updating", name, record_id);
                self.update(&record_id, name, value, cancel).await?;
                Ok(UpsertOutcome::Updated { record_id })
            }
            Err(UpsertError::NotFound) => {
                info!("TXT record {} not found, creating", name);
                let record_id = self.create(name, value, cancel).await?;
                Ok(UpsertOutcome::Created { record_id })
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve the ID of the first TXT record named `name`
    async fn find(&self, name: &str, cancel: &CancellationToken) -> Result<String> {
        let zone = until_cancelled(cancel, self.api.get_zone(&self.zone_id))
            .await?
            .map_err(|e| UpsertError::operation(Operation::GetZone, e))?;

        // The remote system reports fully-qualified names
        let fqdn = fully_qualified_name(name, &zone.name);
        debug!("Looking up TXT record {} in zone {}", fqdn, self.zone_id);

        let records = match until_cancelled(
            cancel,
            self.api.list_txt_records(&self.zone_id, &fqdn),
        )
        .await?
        {
            Ok(records) => records,
            Err(e) => {
                return Err(match e.status_code() {
                    None => UpsertError::Request(e),
                    Some(404) => UpsertError::NotFound,
                    Some(status) => UpsertError::Api { status, source: e },
                });
            }
        };

        if records.len() > 1 {
            debug!(
                "{} TXT records named {}, managing only the first",
                records.len(),
                fqdn
            );
        }

        records
            .into_iter()
            .next()
            .map(|record| record.id)
            .ok_or(UpsertError::NotFound)
    }

    async fn create(
        &self,
        name: &str,
        content: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let record = until_cancelled(
            cancel,
            self.api.create_txt_record(&self.zone_id, name, content),
        )
        .await?
        .map_err(|e| UpsertError::operation(Operation::CreateTxtRecord, e))?;

        info!("Created TXT record {} ({})", record.name, record.id);
        Ok(record.id)
    }

    async fn update(
        &self,
        record_id: &str,
        name: &str,
        content: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let record = until_cancelled(
            cancel,
            self.api.update_txt_record(&self.zone_id, record_id, name, content),
        )
        .await?
        .map_err(|e| UpsertError::operation(Operation::UpdateTxtRecord, e))?;

        info!("Updated TXT record {} ({})", record.name, record.id);
        Ok(())
    }
}

/// Run `fut` unless `cancel` fires first
///
/// An already-cancelled token wins over a ready future.
async fn until_cancelled<F: Future>(cancel: &CancellationToken, fut: F) -> Result<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(UpsertError::Cancelled),
        output = fut => Ok(output),
    }
}
