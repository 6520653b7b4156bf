//! Test doubles and common utilities for upsert contract tests
//!
//! The doubles wrap [`MemoryZoneApi`] so the zone behaves realistically,
//! while recording every call and allowing failures to be injected per
//! operation.

#![allow(dead_code)]

use async_trait::async_trait;
use cfdns_core::traits::{TxtRecord, Zone, ZoneApi};
use cfdns_core::{ApiError, MemoryZoneApi, TxtRecordUpserter};
use std::sync::{Arc, Mutex};

pub const ZONE_ID: &str = "023e105f4ecef8ad9ca31a8372d0c353";
pub const ZONE_NAME: &str = "example.com";

/// A remote call observed by [`RecordingZoneApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetZone {
        zone_id: String,
    },
    ListTxtRecords {
        zone_id: String,
        fqdn: String,
    },
    CreateTxtRecord {
        zone_id: String,
        name: String,
        content: String,
    },
    UpdateTxtRecord {
        zone_id: String,
        record_id: String,
        name: String,
        content: String,
    },
}

/// Failure to inject into one operation
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    /// Respond with this status
    Status(u16),
    /// Fail without a response
    Transport,
}

impl Failure {
    fn to_error(self) -> ApiError {
        match self {
            Failure::Status(status) => ApiError::status(status, "injected failure"),
            Failure::Transport => ApiError::transport("connection refused"),
        }
    }
}

#[derive(Debug, Default)]
struct Failures {
    get_zone: Option<Failure>,
    list: Option<Failure>,
    create: Option<Failure>,
    update: Option<Failure>,
}

/// A ZoneApi that records calls and can fail on demand
///
/// Clones share the call log, the failure plan and the underlying zone.
#[derive(Debug, Clone)]
pub struct RecordingZoneApi {
    zone: MemoryZoneApi,
    calls: Arc<Mutex<Vec<Call>>>,
    failures: Arc<Mutex<Failures>>,
}

impl RecordingZoneApi {
    pub fn new() -> Self {
        Self {
            zone: MemoryZoneApi::new(ZONE_ID, ZONE_NAME),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(Failures::default())),
        }
    }

    /// The zone behind the recorder
    pub fn zone(&self) -> &MemoryZoneApi {
        &self.zone
    }

    /// All calls so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn create_call_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::CreateTxtRecord { .. }))
            .count()
    }

    pub fn update_call_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::UpdateTxtRecord { .. }))
            .count()
    }

    /// The fqdn of every list query so far
    pub fn listed_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::ListTxtRecords { fqdn, .. } => Some(fqdn),
                _ => None,
            })
            .collect()
    }

    pub fn fail_get_zone(&self, failure: Failure) {
        self.failures.lock().unwrap().get_zone = Some(failure);
    }

    pub fn fail_list(&self, failure: Failure) {
        self.failures.lock().unwrap().list = Some(failure);
    }

    pub fn fail_create(&self, failure: Failure) {
        self.failures.lock().unwrap().create = Some(failure);
    }

    pub fn fail_update(&self, failure: Failure) {
        self.failures.lock().unwrap().update = Some(failure);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ZoneApi for RecordingZoneApi {
    async fn get_zone(&self, zone_id: &str) -> Result<Zone, ApiError> {
        self.record(Call::GetZone {
            zone_id: zone_id.to_string(),
        });
        let failure = self.failures.lock().unwrap().get_zone;
        if let Some(failure) = failure {
            return Err(failure.to_error());
        }
        self.zone.get_zone(zone_id).await
    }

    async fn list_txt_records(
        &self,
        zone_id: &str,
        fqdn: &str,
    ) -> Result<Vec<TxtRecord>, ApiError> {
        self.record(Call::ListTxtRecords {
            zone_id: zone_id.to_string(),
            fqdn: fqdn.to_string(),
        });
        let failure = self.failures.lock().unwrap().list;
        if let Some(failure) = failure {
            return Err(failure.to_error());
        }
        self.zone.list_txt_records(zone_id, fqdn).await
    }

    async fn create_txt_record(
        &self,
        zone_id: &str,
        name: &str,
        content: &str,
    ) -> Result<TxtRecord, ApiError> {
        self.record(Call::CreateTxtRecord {
            zone_id: zone_id.to_string(),
            name: name.to_string(),
            content: content.to_string(),
        });
        let failure = self.failures.lock().unwrap().create;
        if let Some(failure) = failure {
            return Err(failure.to_error());
        }
        self.zone.create_txt_record(zone_id, name, content).await
    }

    async fn update_txt_record(
        &self,
        zone_id: &str,
        record_id: &str,
        name: &str,
        content: &str,
    ) -> Result<TxtRecord, ApiError> {
        self.record(Call::UpdateTxtRecord {
            zone_id: zone_id.to_string(),
            record_id: record_id.to_string(),
            name: name.to_string(),
            content: content.to_string(),
        });
        let failure = self.failures.lock().unwrap().update;
        if let Some(failure) = failure {
            return Err(failure.to_error());
        }
        self.zone
            .update_txt_record(zone_id, record_id, name, content)
            .await
    }
}

/// A ZoneApi whose list call never completes
///
/// Used to observe cancellation of an in-flight call.
#[derive(Debug, Clone)]
pub struct StalledListZoneApi {
    inner: RecordingZoneApi,
}

impl StalledListZoneApi {
    pub fn new(inner: RecordingZoneApi) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ZoneApi for StalledListZoneApi {
    async fn get_zone(&self, zone_id: &str) -> Result<Zone, ApiError> {
        self.inner.get_zone(zone_id).await
    }

    async fn list_txt_records(
        &self,
        zone_id: &str,
        fqdn: &str,
    ) -> Result<Vec<TxtRecord>, ApiError> {
        self.inner.record(Call::ListTxtRecords {
            zone_id: zone_id.to_string(),
            fqdn: fqdn.to_string(),
        });
        std::future::pending().await
    }

    async fn create_txt_record(
        &self,
        zone_id: &str,
        name: &str,
        content: &str,
    ) -> Result<TxtRecord, ApiError> {
        self.inner.create_txt_record(zone_id, name, content).await
    }

    async fn update_txt_record(
        &self,
        zone_id: &str,
        record_id: &str,
        name: &str,
        content: &str,
    ) -> Result<TxtRecord, ApiError> {
        self.inner
            .update_txt_record(zone_id, record_id, name, content)
            .await
    }
}

/// Build an upserter over a clone of `api`
pub fn upserter_for(api: &RecordingZoneApi) -> TxtRecordUpserter {
    TxtRecordUpserter::new(Box::new(api.clone()), ZONE_ID)
}
