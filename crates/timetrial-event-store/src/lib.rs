//! Time Trial — in-memory event store.
//!
//! Realizes the external-store contract (`EventRepository`) plus the two
//! secondary lookups the query layer needs: map name to stream id and
//! player id to contributing streams. Also ships the sample-data seeder.

pub mod memory_event_store;
pub mod seed;

pub use memory_event_store::MemoryEventStore;
