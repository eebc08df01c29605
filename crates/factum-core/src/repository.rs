//! Repository — orchestrates aggregates against an event store.

use uuid::Uuid;

use crate::aggregate::{Aggregate, ApplyMap};
use crate::error::Error;
use crate::store::{EventStore, ExpectedVersion};

/// Loads aggregates by replaying their streams and saves them under an
/// optimistic version check.
#[derive(Debug)]
pub struct Repository<S> {
    event_store: S,
}

impl<S: EventStore> Repository<S> {
    /// Creates a repository over the given store.
    #[must_use]
    pub fn new(event_store: S) -> Self {
        Self { event_store }
    }

    /// The underlying event store.
    pub fn event_store(&self) -> &S {
        &self.event_store
    }

    /// Loads an aggregate by replaying its stream with `apply_map`.
    ///
    /// Returns `Ok(None)` when the stream has no events; a well-formed id
    /// alone does not imply an aggregate exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] when the store fails to read.
    pub async fn load(&self, id: Uuid, apply_map: &ApplyMap) -> Result<Option<Aggregate>, Error> {
        let events = self.event_store.events(Some(id), 0).await?;
        if events.is_empty() {
            return Ok(None);
        }
        Ok(Some(Aggregate::generate_from_events(
            id, events, true, apply_map,
        )))
    }

    /// Persists the aggregate's uncommitted events and returns the
    /// committed aggregate.
    ///
    /// The expected version is the aggregate's last *committed* version,
    /// so any writer that advanced the stream since this aggregate was
    /// loaded causes a conflict.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::VersionConflict`] unchanged — the caller must
    /// reload and retry — and [`Error::Storage`] when persistence fails.
    pub async fn save(&self, aggregate: &Aggregate) -> Result<Aggregate, Error> {
        self.event_store
            .save_events(
                aggregate.id(),
                aggregate.uncommitted_events().to_vec(),
                ExpectedVersion::Exact(aggregate.version()),
            )
            .await?;
        Ok(aggregate.clone().mark_events_committed())
    }
}
