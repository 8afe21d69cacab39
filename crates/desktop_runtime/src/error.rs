//! Failure taxonomy for the desktop session runtime.
//!
//! None of these escape the runtime's public operations: each is recovered where it is detected
//! and surfaced through logging or the notification service.

use thiserror::Error;

use crate::reducer::ReducerError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Recoverable session-level failures.
pub enum SessionError {
    /// A reducer action was rejected (unknown app or missing window).
    #[error(transparent)]
    Reducer(#[from] ReducerError),
    /// The stored session record could not be decoded.
    #[error("stored session is corrupt: {0}")]
    CorruptSession(String),
    /// A deep-link preload payload was missing or could not be read.
    #[error("result `{key}` could not be retrieved: {reason}")]
    ResultRetrieval {
        /// Result key from the deep link.
        key: String,
        /// Why retrieval failed.
        reason: String,
    },
    /// A compound launch had no populated fields.
    #[error("compound result has no populated fields")]
    EmptyCompoundResult,
    /// The host storage service failed.
    #[error("session storage failed: {0}")]
    Storage(String),
}
