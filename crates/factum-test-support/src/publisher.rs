//! Test publishers — deterministic `Publisher` implementations.

use std::sync::{Arc, Mutex};

use factum_core::event::Event;
use factum_core::store::Publisher;

/// Records every event handed to its publisher, in publication order.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    published: Arc<Mutex<Vec<Event>>>,
}

impl RecordingPublisher {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a publisher that records into this recorder and always
    /// succeeds.
    #[must_use]
    pub fn publisher(&self) -> Publisher {
        let published = Arc::clone(&self.published);
        Arc::new(move |event: &Event| {
            published.lock().unwrap().push(event.clone());
            Ok(())
        })
    }

    /// Returns a snapshot of everything published so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn published_events(&self) -> Vec<Event> {
        self.published.lock().unwrap().clone()
    }
}

/// Returns a publisher that fails on every event. Useful for verifying
/// that publication failures never affect write outcomes.
#[must_use]
pub fn failing_publisher() -> Publisher {
    Arc::new(|_: &Event| Err("publisher offline".into()))
}
