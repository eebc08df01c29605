//! Domain command — an immutable request to act — and its dispatch table.
//!
//! Commands sit at the boundary of the core: dispatch is a plain map
//! lookup with no invariants beyond "unknown type is a no-op".

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clock::{Clock, SystemClock};
use crate::error::Error;

/// An immutable request to act.
///
/// Command types should be present-tense actions, e.g. `"DoSomething"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Command type tag.
    pub command_type: String,
    /// When the command was expressed, UTC.
    pub timestamp: DateTime<Utc>,
    /// Opaque command payload.
    pub data: Map<String, Value>,
}

impl Command {
    /// Generates a fresh command of the given type with empty data and the
    /// current UTC time.
    #[must_use]
    pub fn generate(command_type: impl Into<String>) -> Self {
        Self {
            command_type: command_type.into(),
            timestamp: SystemClock.now(),
            data: Map::new(),
        }
    }

    /// Returns a copy carrying the given payload.
    #[must_use]
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Returns a copy stamped with the given instant.
    #[must_use]
    pub fn issued_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A command handler: acts on a command within a caller-supplied context
/// (stores, repositories, configuration).
pub type HandlerFn<C> = Arc<dyn Fn(&C, &Command) -> Result<(), Error> + Send + Sync>;

/// Immutable table mapping command types to [`HandlerFn`] handlers; built
/// once per handler type and injected, like
/// [`ApplyMap`](crate::aggregate::ApplyMap).
pub struct HandleMap<C> {
    handlers: HashMap<String, HandlerFn<C>>,
}

impl<C> HandleMap<C> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers a handler for a command type, returning the extended
    /// table.
    #[must_use]
    pub fn on<F>(mut self, command_type: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&C, &Command) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.handlers.insert(command_type.into(), Arc::new(handler));
        self
    }

    fn get(&self, command_type: &str) -> Option<&HandlerFn<C>> {
        self.handlers.get(command_type)
    }
}

impl<C> Default for HandleMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for HandleMap<C> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<C> fmt::Debug for HandleMap<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleMap")
            .field("command_types", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Dispatches commands to handlers within a held context.
#[derive(Debug, Clone)]
pub struct CommandHandler<C> {
    context: C,
    handlers: HandleMap<C>,
}

impl<C> CommandHandler<C> {
    /// Creates a dispatcher over `context` with the given table.
    #[must_use]
    pub fn new(context: C, handlers: HandleMap<C>) -> Self {
        Self { context, handlers }
    }

    /// The held context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Handles a command; unknown command types succeed as a no-op.
    ///
    /// # Errors
    ///
    /// Propagates whatever the matched handler returns.
    pub fn handle(&self, command: &Command) -> Result<(), Error> {
        match self.handlers.get(&command.command_type) {
            Some(handler) => handler(&self.context, command),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_generate_applies_defaults() {
        let command = Command::generate("DoSomething");

        assert_eq!(command.command_type, "DoSomething");
        assert!(command.data.is_empty());
    }

    #[test]
    fn test_handle_dispatches_by_command_type() {
        let handlers = HandleMap::new().on("DoSomething", |seen: &Mutex<Vec<String>>, command| {
            seen.lock().unwrap().push(command.command_type.clone());
            Ok(())
        });
        let handler = CommandHandler::new(Mutex::new(Vec::new()), handlers);

        handler.handle(&Command::generate("DoSomething")).unwrap();

        assert_eq!(*handler.context().lock().unwrap(), ["DoSomething"]);
    }

    #[test]
    fn test_unknown_command_type_is_noop() {
        let handlers: HandleMap<()> = HandleMap::new();
        let handler = CommandHandler::new((), handlers);

        let result = handler.handle(&Command::generate("DoSomethingElse"));

        assert!(result.is_ok());
    }
}
