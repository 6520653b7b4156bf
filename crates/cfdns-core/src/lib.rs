// # cfdns-core
//
// Core library for upserting a single TXT record in a DNS zone.
//
// ## Architecture Overview
//
// - **ZoneApi**: Trait for the four remote calls the upserter needs
// - **TxtRecordUpserter**: Find-then-create-or-update orchestration
// - **MemoryZoneApi**: In-memory ZoneApi for tests and offline runs
// - **UpserterConfig**: Environment-driven configuration
//
// ## Design Principles
//
// 1. **Narrow**: One record kind (TXT), one record per name, one zone
// 2. **Closed errors**: Callers match on `UpsertError` variants
// 3. **No hidden state**: Nothing is cached between upserts
// 4. **No retries**: Every failure is returned to the caller

pub mod config;
pub mod error;
pub mod traits;
pub mod upserter;
pub mod zone;

// Re-export core types for convenience
pub use config::UpserterConfig;
pub use error::{ApiError, ConfigError, Operation, Result, UpsertError};
pub use traits::{TxtRecord, Zone, ZoneApi};
pub use upserter::{TxtRecordUpserter, UpsertOutcome, fully_qualified_name};
pub use zone::MemoryZoneApi;
