//! Core traits for the upserter
//!
//! - [`ZoneApi`]: the remote DNS-zone management capability

pub mod zone_api;

pub use zone_api::{TxtRecord, Zone, ZoneApi};
