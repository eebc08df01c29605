//! Event-sourced aggregate — an immutable entity reconstituted from facts.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::Error;
use crate::event::Event;

/// A pure state-transition handler: applies one event to an aggregate and
/// returns the updated aggregate.
pub type ApplyFn = Arc<dyn Fn(Aggregate, &Event) -> Aggregate + Send + Sync>;

/// Immutable table mapping event types to [`ApplyFn`] handlers.
///
/// One table is built per aggregate type and injected at call sites; this
/// replaces dynamic dispatch with an explicit, openly extensible mapping.
/// Event types without a handler fall back to a no-op that leaves the
/// aggregate unchanged (the event is still recorded in history).
#[derive(Clone, Default)]
pub struct ApplyMap {
    handlers: HashMap<String, ApplyFn>,
}

impl ApplyMap {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for an event type, returning the extended table.
    #[must_use]
    pub fn on<F>(mut self, event_type: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Aggregate, &Event) -> Aggregate + Send + Sync + 'static,
    {
        self.handlers.insert(event_type.into(), Arc::new(handler));
        self
    }

    fn get(&self, event_type: &str) -> Option<&ApplyFn> {
        self.handlers.get(event_type)
    }
}

impl fmt::Debug for ApplyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplyMap")
            .field("event_types", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// An entity whose state is derived solely from replaying its event history.
///
/// All operations produce new values; no caller ever observes an aggregate
/// change after construction. Committed `events` are ordered by strictly
/// increasing version; `uncommitted_events` hold facts applied in memory
/// but not yet persisted, which lets callers apply events speculatively,
/// inspect the resulting state, and only persist if appropriate.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    id: Uuid,
    events: Vec<Event>,
    uncommitted_events: Vec<Event>,
    state: Map<String, Value>,
}

impl Aggregate {
    /// Generates a fresh aggregate with a random identity and no history.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_id(Uuid::new_v4())
    }

    /// Generates a fresh aggregate from a string identity token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if `id` is not a valid UUID.
    pub fn generate_with_id(id: &str) -> Result<Self, Error> {
        let parsed = Uuid::parse_str(id).map_err(|source| Error::InvalidIdentity {
            value: id.to_owned(),
            source,
        })?;
        Ok(Self::from_id(parsed))
    }

    /// Generates a fresh aggregate with the given identity.
    #[must_use]
    pub fn from_id(id: Uuid) -> Self {
        Self {
            id,
            events: Vec::new(),
            uncommitted_events: Vec::new(),
            state: Map::new(),
        }
    }

    /// Reconstitutes an aggregate by folding `apply_event` over `events`.
    ///
    /// Replay passes `committed: true`; pass `false` to rebuild with the
    /// history left pending instead.
    #[must_use]
    pub fn generate_from_events(
        id: Uuid,
        events: impl IntoIterator<Item = Event>,
        committed: bool,
        apply_map: &ApplyMap,
    ) -> Self {
        Self::from_id(id).apply_events(events, committed, apply_map)
    }

    /// Applies one event, returning the updated aggregate.
    ///
    /// The handler for `event.event_type` (no-op when unmapped) projects
    /// the event into state; the event is then versioned if it does not
    /// already carry a version, and appended to committed history when
    /// `committed` or to the pending list otherwise.
    #[must_use]
    pub fn apply_event(self, event: Event, committed: bool, apply_map: &ApplyMap) -> Self {
        // Version from the pre-apply aggregate; handlers only touch state.
        let next_version = self.uncommitted_version() + 1;

        let mut aggregate = match apply_map.get(&event.event_type) {
            Some(handler) => handler(self, &event),
            None => self,
        };

        let event = if event.is_versioned() {
            event
        } else {
            Event {
                version: next_version,
                ..event
            }
        };

        if committed {
            aggregate.events.push(event);
        } else {
            aggregate.uncommitted_events.push(event);
        }
        aggregate
    }

    /// Applies events in order; later events observe the state produced by
    /// earlier ones.
    #[must_use]
    pub fn apply_events(
        self,
        events: impl IntoIterator<Item = Event>,
        committed: bool,
        apply_map: &ApplyMap,
    ) -> Self {
        events.into_iter().fold(self, |aggregate, event| {
            aggregate.apply_event(event, committed, apply_map)
        })
    }

    /// The aggregate identity.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Committed event history, in version order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events applied in memory but not yet persisted.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[Event] {
        &self.uncommitted_events
    }

    /// The current state projection.
    #[must_use]
    pub fn state(&self) -> &Map<String, Value> {
        &self.state
    }

    /// Version of the last committed event, or 0 with no history.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.events.last().map_or(0, |event| event.version)
    }

    /// Version of the last event across committed and uncommitted history,
    /// or 0 with no events at all. This is the version a writer declares
    /// as expected when persisting.
    #[must_use]
    pub fn uncommitted_version(&self) -> i64 {
        self.uncommitted_events
            .last()
            .or_else(|| self.events.last())
            .map_or(0, |event| event.version)
    }

    /// Returns a copy with `state[key] = value`; used by apply handlers to
    /// project facts into readable state.
    #[must_use]
    pub fn set_state(mut self, key: impl Into<String>, value: Value) -> Self {
        self.state.insert(key.into(), value);
        self
    }

    /// Moves pending events into committed history, returning the updated
    /// aggregate. Called after successful persistence; a no-op when
    /// nothing is pending.
    #[must_use]
    pub fn mark_events_committed(mut self) -> Self {
        self.events.append(&mut self.uncommitted_events);
        self
    }
}
