//! Error handling for the seqtrie library
//!
//! Every error raised by a trie is a contract violation reported synchronously
//! to the caller. None of them are transient, so nothing here is retryable.

use thiserror::Error;

/// Main error type for trie operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// An empty key or label was supplied where a non-empty one is required
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message describing the issue
        message: String,
    },

    /// A sub-trie was requested for a key which is not present
    #[error("Not found: {key}")]
    NotFound {
        /// Debug rendering of the missing key
        key: String,
    },

    /// The operation is not supported by this successor store
    #[error("Not supported: {operation}")]
    Unsupported {
        /// Name of the unsupported operation
        operation: String,
    },

    /// A cursor was advanced after its trie was modified
    #[error("Concurrent modification: expected modification {expected}, found {actual}")]
    ConcurrentModification {
        /// Modification count captured when the cursor was created
        expected: u64,
        /// Modification count of the trie when the cursor was advanced
        actual: u64,
    },
}

impl TrieError {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a not found error from the debug rendering of a key
    pub fn not_found<K: std::fmt::Debug + ?Sized>(key: &K) -> Self {
        Self::NotFound {
            key: format!("{:?}", key),
        }
    }

    /// Create a not supported error
    pub fn unsupported<S: Into<String>>(operation: S) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create a concurrent modification error
    pub fn concurrent_modification(expected: u64, actual: u64) -> Self {
        Self::ConcurrentModification { expected, actual }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "argument",
            Self::NotFound { .. } => "lookup",
            Self::Unsupported { .. } => "unsupported",
            Self::ConcurrentModification { .. } => "concurrency",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TrieError>;

/// Reject empty keys and labels.
#[inline]
pub(crate) fn check_non_empty<A>(key: &[A], what: &str) -> Result<()> {
    if key.is_empty() {
        Err(TrieError::invalid_argument(format!("{} must not be empty", what)))
    } else {
        Ok(())
    }
}
