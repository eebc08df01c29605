//! Test stores — mock `EventStore` implementations.

use async_trait::async_trait;
use uuid::Uuid;

use factum_core::error::Error;
use factum_core::event::Event;
use factum_core::store::{EventStore, ExpectedVersion, Stream};

/// An event store whose every operation fails with a storage error.
/// Useful for exercising error-handling paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEventStore;

fn storage_error() -> Error {
    Error::Storage("engine unavailable".to_owned())
}

#[async_trait]
impl EventStore for FailingEventStore {
    async fn save_events(
        &self,
        _stream_id: Uuid,
        _events: Vec<Event>,
        _expected_version: ExpectedVersion,
    ) -> Result<(), Error> {
        Err(storage_error())
    }

    async fn events(&self, _stream_id: Option<Uuid>, _start: usize) -> Result<Vec<Event>, Error> {
        Err(storage_error())
    }

    async fn streams(&self, _start: usize) -> Result<Vec<Stream>, Error> {
        Err(storage_error())
    }
}
