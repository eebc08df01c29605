//! Event store contract: version-checked append, ordered read-back.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::event::Event;

/// The version a writer declares when appending to a stream.
///
/// Replaces the original integer sentinel protocol with an explicit
/// enumeration; [`Exact(0)`](ExpectedVersion::Exact) and
/// [`NoStream`](ExpectedVersion::NoStream) are both satisfied only by a
/// stream with no events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Bypass the check entirely; append unconditionally.
    Any,
    /// Require that the stream has no events yet.
    NoStream,
    /// Require that the stream's last stored version equals this value.
    Exact(i64),
}

impl ExpectedVersion {
    /// Verifies this expectation against the stream's last stored event.
    ///
    /// Implementations of [`EventStore`] must run this check (or an
    /// equivalent) atomically with the append for the target stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionConflict`] when the expectation does not
    /// hold.
    pub fn check(self, stream_id: Uuid, last_event: Option<&Event>) -> Result<(), Error> {
        let actual = last_event.map_or(0, |event| event.version);
        let satisfied = match self {
            Self::Any => true,
            Self::NoStream => last_event.is_none(),
            Self::Exact(expected) => actual == expected,
        };
        if satisfied {
            Ok(())
        } else {
            Err(Error::VersionConflict {
                stream_id,
                expected: self,
                actual,
            })
        }
    }
}

impl fmt::Display for ExpectedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::NoStream => f.write_str("no stream"),
            Self::Exact(version) => write!(f, "{version}"),
        }
    }
}

/// Derived stream descriptor; recomputable from the event log.
///
/// Exists only to support listing the streams known to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    /// The stream identity.
    pub id: Uuid,
    /// Timestamp of the stream's first event.
    pub timestamp: DateTime<Utc>,
    /// Ordinal position by first-appearance order across the store.
    pub number: usize,
}

/// Outcome of one publication attempt.
pub type PublishResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Callback invoked once per successfully stored event, in append order
/// within a save call. Failures are reported, never propagated: a failed
/// publication does not roll back the write and does not abort remaining
/// publications in the batch.
pub type Publisher = Arc<dyn Fn(&Event) -> PublishResult + Send + Sync>;

/// Contract for append-only event persistence with optimistic concurrency.
///
/// The logical contract any real backing store must satisfy: global append
/// order, per-stream order, stable stream enumeration order, and a
/// version-check-then-append sequence that is atomic per stream with
/// respect to other writers.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends `events` to `stream_id` after checking `expected_version`
    /// against the stream's last stored event, then publishes each stored
    /// event in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionConflict`] before any write when the
    /// expectation does not hold, or [`Error::Storage`] when the backing
    /// engine fails to persist.
    async fn save_events(
        &self,
        stream_id: Uuid,
        events: Vec<Event>,
        expected_version: ExpectedVersion,
    ) -> Result<(), Error>;

    /// Returns an ordered snapshot of events: the given stream's history,
    /// or every event across all streams in global append order when
    /// `stream_id` is `None`. `start` skips the first N matching entries.
    /// Each call reads current store state afresh.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] when the backing engine fails to read.
    async fn events(&self, stream_id: Option<Uuid>, start: usize) -> Result<Vec<Event>, Error>;

    /// Returns the most recent event of a stream, or `None` for a stream
    /// with no events.
    ///
    /// The default implementation materializes the stream and takes the
    /// last entry; implementations with an index should override it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] when the backing engine fails to read.
    async fn last_event(&self, stream_id: Uuid) -> Result<Option<Event>, Error> {
        Ok(self.events(Some(stream_id), 0).await?.pop())
    }

    /// Returns stream descriptors in first-appearance order, skipping the
    /// first `start`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] when the backing engine fails to read.
    async fn streams(&self, start: usize) -> Result<Vec<Stream>, Error>;
}
