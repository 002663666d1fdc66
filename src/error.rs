//! Error types for the `unspool` crate.
//!
//! This module defines [`UnspoolError`], the unified error type returned by all
//! fallible operations in the crate. Every variant maps to a stable
//! machine-readable code (see [`UnspoolError::code`]) so host applications can
//! classify failures without parsing messages.

use std::{io::Error as IoError, path::PathBuf};

use thiserror::Error;

/// The unified error type for all `unspool` operations.
///
/// Every public method that can fail returns `Result<T, UnspoolError>`.
/// Variants carry enough context to diagnose the problem without needing
/// additional logging at the call site.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UnspoolError {
    /// The local input path does not exist or could not be read.
    #[error("Input file not found or unreadable: {path}")]
    InputNotFound {
        /// The resolved local path that was probed.
        path: PathBuf,
    },

    /// The input descriptor uses a scheme the resolver does not recognise.
    #[error("Unsupported input: {input}")]
    UnsupportedInput {
        /// The caller-supplied input string.
        input: String,
    },

    /// Remote byte acquisition failed (network error, non-2xx response,
    /// or the fetched bytes could not be spooled to disk).
    #[error("Failed to fetch {uri}: {reason}")]
    FetchFailed {
        /// The remote URI that was requested.
        uri: String,
        /// Underlying transport or spooling failure.
        reason: String,
    },

    /// Both decode tiers failed, or the primary tier reported zero frames
    /// and the fallback could not produce a still image either.
    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    /// A frame could not be serialized or persisted to the output directory.
    #[error("Failed to write frame to {path}: {reason}")]
    WriteFailed {
        /// Destination path of the frame that failed.
        path: PathBuf,
        /// Underlying serialization or filesystem failure.
        reason: String,
    },

    /// The operation was cancelled via a
    /// [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,

    /// Catch-all for unexpected failures not classified above.
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl UnspoolError {
    /// Short machine-readable code identifying the error kind.
    ///
    /// Stable across releases; intended for structured error reporting at
    /// RPC or CLI boundaries.
    pub fn code(&self) -> &'static str {
        match self {
            UnspoolError::InputNotFound { .. } => "input-not-found",
            UnspoolError::UnsupportedInput { .. } => "unsupported-input",
            UnspoolError::FetchFailed { .. } => "fetch-failed",
            UnspoolError::DecodeFailed(_) => "decode-failed",
            UnspoolError::WriteFailed { .. } => "write-failed",
            UnspoolError::Cancelled => "cancelled",
            UnspoolError::Unknown(_) => "unknown",
        }
    }
}

impl From<IoError> for UnspoolError {
    fn from(error: IoError) -> Self {
        UnspoolError::Unknown(error.to_string())
    }
}
