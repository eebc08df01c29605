//! Domain event — an immutable, versioned fact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::Error;

/// Version value meaning "not yet assigned a position within a stream".
pub const UNVERSIONED: i64 = 0;

/// An immutable domain fact.
///
/// Event types should be past-tense, e.g. `"SomethingHappened"`. An event
/// is created once and never changes; every setter consumes the value and
/// returns a new one. The only field assigned after creation is `version`,
/// and only when it is still [`UNVERSIONED`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,
    /// Event type tag.
    pub event_type: String,
    /// Stream this event belongs to; `None` for global/unassigned events.
    pub stream_id: Option<Uuid>,
    /// When the event happened, UTC.
    pub timestamp: DateTime<Utc>,
    /// Opaque event payload.
    pub data: Map<String, Value>,
    /// 1-based position within the owning stream; 0 when unassigned.
    pub version: i64,
}

impl Event {
    /// Generates a fresh event of the given type with defaults: a random
    /// id, no stream, empty data, the current UTC time, and no version.
    #[must_use]
    pub fn generate(event_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: event_type.into(),
            stream_id: None,
            timestamp: SystemClock.now(),
            data: Map::new(),
            version: UNVERSIONED,
        }
    }

    /// Returns a copy with the given event id.
    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Returns a copy owned by the given stream.
    #[must_use]
    pub fn with_stream_id(mut self, stream_id: Uuid) -> Self {
        self.stream_id = Some(stream_id);
        self
    }

    /// Returns a copy carrying the given payload.
    #[must_use]
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Returns a copy stamped with the given creation instant.
    #[must_use]
    pub fn recorded_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Returns a copy with the given version assigned.
    ///
    /// This is the only door for versions; stream positions are never
    /// negative.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersion`] if `version` is negative.
    pub fn with_version(mut self, version: i64) -> Result<Self, Error> {
        if version < 0 {
            return Err(Error::InvalidVersion(version));
        }
        self.version = version;
        Ok(self)
    }

    /// Whether this event has been assigned a position within a stream.
    #[must_use]
    pub fn is_versioned(&self) -> bool {
        self.version > UNVERSIONED
    }
}
