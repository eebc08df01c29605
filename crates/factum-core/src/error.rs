//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

use crate::store::ExpectedVersion;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Optimistic concurrency conflict: the stream advanced past the
    /// version the writer declared. Recoverable by reload-and-retry.
    #[error("version conflict on stream {stream_id}: expected {expected}, found {actual}")]
    VersionConflict {
        /// The stream that had the conflict.
        stream_id: Uuid,
        /// The version the writer declared.
        expected: ExpectedVersion,
        /// The version actually stored (0 for an empty stream).
        actual: i64,
    },

    /// A malformed aggregate identity token was supplied.
    #[error("invalid aggregate identity: {value:?}")]
    InvalidIdentity {
        /// The rejected input.
        value: String,
        /// The underlying parse failure.
        #[source]
        source: uuid::Error,
    },

    /// A negative event version was supplied at construction time.
    #[error("invalid event version: {0}")]
    InvalidVersion(i64),

    /// The backing engine failed to persist events.
    #[error("storage failure: {0}")]
    Storage(String),
}
