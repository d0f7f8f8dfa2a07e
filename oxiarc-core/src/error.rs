//! Error types for OxiArc operations.
//!
//! This module provides the error type shared by every decoder in the
//! workspace. Format violations, resource exhaustion, failures reported by a
//! pluggable entropy decoder and broken internal invariants are kept apart so
//! that callers can decide how to surface them.

use thiserror::Error;

/// Boxed error produced by a pluggable entropy decoder.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for OxiArc operations.
#[derive(Debug, Error)]
pub enum OxiArcError {
    /// Corrupted or inconsistent framing in the compressed stream.
    #[error("Corrupted data at offset {offset}: {message}")]
    CorruptedData {
        /// Byte offset (from the start of the stream) where corruption was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// Unsupported or malformed decoder options.
    #[error("Invalid options: {message}")]
    InvalidOptions {
        /// Description of the options error.
        message: String,
    },

    /// Memory for a decoder buffer could not be reserved.
    #[error("Allocation of {requested} bytes failed")]
    Allocation {
        /// Number of bytes that were requested.
        requested: usize,
    },

    /// Failure reported by the entropy decoder, passed through unchanged.
    #[error("Entropy decoder error: {0}")]
    Entropy(#[source] BoxedError),

    /// Invalid distance in an LZ back-reference.
    #[error("Invalid back-reference distance: {distance} exceeds history size {history_size}")]
    InvalidDistance {
        /// The invalid distance value.
        distance: usize,
        /// Current history buffer size.
        history_size: usize,
    },

    /// An internal invariant was violated. This is a bug, not bad input.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the violated invariant.
        message: String,
    },
}

/// Result type alias for OxiArc operations.
pub type Result<T> = std::result::Result<T, OxiArcError>;

impl OxiArcError {
    /// Create a corrupted data error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptedData {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid options error.
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }

    /// Create an allocation error.
    pub fn allocation(requested: usize) -> Self {
        Self::Allocation { requested }
    }

    /// Wrap an error coming from an entropy decoder.
    pub fn entropy(err: impl Into<BoxedError>) -> Self {
        Self::Entropy(err.into())
    }

    /// Create an invalid distance error.
    pub fn invalid_distance(distance: usize, history_size: usize) -> Self {
        Self::InvalidDistance {
            distance,
            history_size,
        }
    }

    /// Create an internal (programmer) error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error means the input itself is corrupt or invalid.
    ///
    /// Allocation failures and internal errors are not data errors.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::CorruptedData { .. }
                | Self::InvalidOptions { .. }
                | Self::Entropy(_)
                | Self::InvalidDistance { .. }
        )
    }
}
