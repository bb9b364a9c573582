//! Error types for stepdoc library.

use std::io;
use thiserror::Error;

/// Result type alias for stepdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rendering a report.
///
/// Soft failures (unparsable numeric cells, missing step data, tables without
/// the limit header) never surface here; they degrade inside the render.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input or writing to a sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The content tree is structurally malformed at the given node.
    #[error("Malformed content node at {path}: {reason}")]
    MalformedNode {
        /// Path of the offending node, e.g. `$.content[2].content[0]`
        path: String,
        /// What was wrong with it
        reason: String,
    },

    /// The content tree nests deeper than the configured limit.
    #[error("Content nesting exceeds depth {limit} at {path}")]
    DepthExceeded {
        /// Path of the node that crossed the limit
        path: String,
        /// Configured maximum depth
        limit: usize,
    },

    /// A document layout table is unusable.
    #[error("Invalid document layout: {0}")]
    InvalidLayout(String),
}

impl Error {
    /// Build a [`Error::MalformedNode`] for `path`.
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedNode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error comes from the structure of the content tree.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::MalformedNode { .. } | Error::DepthExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::malformed("$.content[1]", "missing `type`");
        assert_eq!(
            err.to_string(),
            "Malformed content node at $.content[1]: missing `type`"
        );

        let err = Error::DepthExceeded {
            path: "$".into(),
            limit: 4,
        };
        assert_eq!(err.to_string(), "Content nesting exceeds depth 4 at $");
        assert!(err.is_structural());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_structural());
    }
}
