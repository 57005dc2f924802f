//! Engine errors.
//!
//! Every engine error is recoverable. `NoHistory` and `NotFound` are expected
//! during normal use (undo at the start of history, a stale id from the host)
//! and the event layer swallows them; `ExternalOpFailed` is the only kind a
//! host is expected to surface to the user.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::doc::ObjectId;

/// Grepable error code and retryable flag for host-facing error reporting.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Undo at the oldest entry or redo at the newest.
    #[error("no history entry in that direction")]
    NoHistory,

    /// An operation referenced an object id that is not in the scene.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// The generative image service failed or returned nothing usable.
    #[error("external image operation failed: {0}")]
    ExternalOpFailed(String),

    /// A drawn shape was released with no usable extent.
    #[error("degenerate shape geometry")]
    InvalidGeometry,

    /// A history restoration or a pointer gesture is still open; the mutation
    /// was rejected.
    #[error("another edit is in progress")]
    Busy,

    /// The selection is not the kind of object the operation needs.
    #[error("operation requires {expected}")]
    WrongKind { expected: &'static str },

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl ErrorCode for EditorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoHistory => "E_NO_HISTORY",
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::ExternalOpFailed(_) => "E_EXTERNAL_OP_FAILED",
            Self::InvalidGeometry => "E_INVALID_GEOMETRY",
            Self::Busy => "E_BUSY",
            Self::WrongKind { .. } => "E_WRONG_KIND",
            Self::Snapshot(_) => "E_SNAPSHOT",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Busy | Self::ExternalOpFailed(_))
    }
}

impl EditorError {
    /// Whether the error is a silent no-op rather than something to report.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::NoHistory | Self::NotFound(_) | Self::InvalidGeometry)
    }
}
