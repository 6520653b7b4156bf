// # Zone API Implementations
//
// Implementations of the ZoneApi trait that live in the core crate.
// Remote implementations live in their own provider crates.

pub mod memory;

pub use memory::MemoryZoneApi;
