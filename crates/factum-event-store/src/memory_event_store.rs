//! In-memory implementation of the `EventStore` contract.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use factum_core::error::Error;
use factum_core::event::Event;
use factum_core::store::{EventStore, ExpectedVersion, Publisher, Stream};

use crate::event_log::EventLog;

/// Event store backed by an in-memory [`EventLog`].
///
/// The log itself is unsynchronized; this store supplies the guarantee the
/// contract requires with one store-wide mutex held across the
/// read-last-version → check → append sequence. Publication runs after
/// the lock is released, so ordering across save calls is unspecified;
/// within one call events are published in append order.
///
/// For tests and reference only — nothing here survives the process.
pub struct MemoryEventStore {
    log: Mutex<EventLog>,
    publisher: Publisher,
}

impl MemoryEventStore {
    /// Creates a store whose publisher logs each stored event.
    #[must_use]
    pub fn new() -> Self {
        Self::with_publisher(Arc::new(|event: &Event| {
            tracing::debug!(event_id = %event.id, event_type = %event.event_type, "event stored");
            Ok(())
        }))
    }

    /// Creates a store that hands every stored event to `publisher`.
    #[must_use]
    pub fn with_publisher(publisher: Publisher) -> Self {
        Self {
            log: Mutex::new(EventLog::new()),
            publisher,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, EventLog>, Error> {
        self.log
            .lock()
            .map_err(|_| Error::Storage("event log mutex poisoned".to_owned()))
    }

    fn publish(&self, events: &[Event]) {
        for event in events {
            if let Err(error) = (self.publisher)(event) {
                // Publication is best-effort: report and keep going.
                tracing::error!(event_id = %event.id, error = %error, "failed publishing event");
            }
        }
    }
}

impl Default for MemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryEventStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryEventStore")
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn save_events(
        &self,
        stream_id: Uuid,
        events: Vec<Event>,
        expected_version: ExpectedVersion,
    ) -> Result<(), Error> {
        let (written, failure) = {
            let mut log = self.lock()?;

            expected_version.check(stream_id, log.last_event(stream_id))?;

            let mut written = Vec::with_capacity(events.len());
            let mut failure = None;
            for event in events {
                match log.append(stream_id, event) {
                    Ok(stored) => written.push(stored),
                    Err(error) => {
                        failure = Some(error);
                        break;
                    }
                }
            }
            (written, failure)
        };

        // Persistence and publication are deliberately not atomic: whatever
        // made it into the log is published, even when the write stopped
        // short.
        self.publish(&written);

        match failure {
            Some(error) => {
                tracing::error!(stream_id = %stream_id, error = %error, "failed to persist events");
                Err(error)
            }
            None => Ok(()),
        }
    }

    async fn events(&self, stream_id: Option<Uuid>, start: usize) -> Result<Vec<Event>, Error> {
        Ok(self.lock()?.events(stream_id, start))
    }

    async fn streams(&self, start: usize) -> Result<Vec<Stream>, Error> {
        Ok(self.lock()?.streams(start))
    }
}
