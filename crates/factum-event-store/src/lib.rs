//! Factum Event Store — reference append-only in-memory storage engine.
//!
//! [`event_log::EventLog`] owns the raw structures (one global append-only
//! log plus a per-stream position index); [`memory_event_store::MemoryEventStore`]
//! wraps a log with the `factum-core` [`EventStore`](factum_core::store::EventStore)
//! contract: version-checked appends, best-effort publication, ordered
//! read-back. Intended for tests and as a reference for real backing
//! stores, not for production persistence.

pub mod event_log;
pub mod memory_event_store;

pub use event_log::EventLog;
pub use memory_event_store::MemoryEventStore;
