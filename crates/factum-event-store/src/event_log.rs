//! Append-only in-memory event database.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use uuid::Uuid;

use factum_core::error::Error;
use factum_core::event::Event;
use factum_core::store::Stream;

/// Append-only event database: one globally ordered log of every event
/// ever written, a stream-id → global-position index, and the order in
/// which streams first appeared. Entries are never modified or removed.
///
/// The log performs no synchronization of its own; the embedding store is
/// responsible for serializing writers (see
/// [`MemoryEventStore`](crate::memory_event_store::MemoryEventStore)).
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
    streams: HashMap<Uuid, Vec<usize>>,
    stream_order: Vec<Uuid>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one event to `stream_id`, returning the event as stored.
    ///
    /// An event that carries no version is assigned its position in the
    /// stream index (0-based); events versioned upstream — by an
    /// aggregate, say — keep the version they arrived with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the stream position cannot be
    /// represented as a version.
    pub fn append(&mut self, stream_id: Uuid, event: Event) -> Result<Event, Error> {
        let position = self.streams.get(&stream_id).map_or(0, Vec::len);

        let event = if event.is_versioned() {
            event
        } else {
            let version = i64::try_from(position)
                .map_err(|_| Error::Storage(format!("stream position {position} out of range")))?;
            event.with_version(version)?
        };

        let index = self.events.len();
        self.events.push(event.clone());
        match self.streams.entry(stream_id) {
            Entry::Occupied(positions) => positions.into_mut().push(index),
            Entry::Vacant(slot) => {
                self.stream_order.push(stream_id);
                slot.insert(vec![index]);
            }
        }
        Ok(event)
    }

    /// Returns an ordered snapshot of events: one stream's history via its
    /// index, or the whole log in global append order when `stream_id` is
    /// `None`; `start` skips the first N matching entries.
    #[must_use]
    pub fn events(&self, stream_id: Option<Uuid>, start: usize) -> Vec<Event> {
        match stream_id {
            Some(stream_id) => self
                .streams
                .get(&stream_id)
                .map(|positions| {
                    positions
                        .iter()
                        .skip(start)
                        .map(|&index| self.events[index].clone())
                        .collect()
                })
                .unwrap_or_default(),
            None => self.events.iter().skip(start).cloned().collect(),
        }
    }

    /// Returns the last event recorded for a stream.
    #[must_use]
    pub fn last_event(&self, stream_id: Uuid) -> Option<&Event> {
        self.streams
            .get(&stream_id)
            .and_then(|positions| positions.last())
            .map(|&index| &self.events[index])
    }

    /// Returns stream descriptors in first-appearance order with absolute
    /// ordinals, skipping the first `start`. Each stream's timestamp is
    /// taken from its first recorded event.
    #[must_use]
    pub fn streams(&self, start: usize) -> Vec<Stream> {
        self.stream_order
            .iter()
            .enumerate()
            .skip(start)
            .filter_map(|(number, &id)| {
                let first = *self.streams.get(&id)?.first()?;
                Some(Stream {
                    id,
                    timestamp: self.events[first].timestamp,
                    number,
                })
            })
            .collect()
    }

    /// Total number of events across all streams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
