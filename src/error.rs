//! Unified error type for pipefeed.
//!
//! All modules funnel their failures into [`Error`]. Nodes perform no local
//! recovery: every error propagates unmodified to the orchestrator, which owns
//! pipeline-wide policy (restart a node, tear the pipeline down, etc.).

use std::fmt;

/// Unified error type covering all failure modes in pipefeed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An external process could not be created (bad executable, bad
    /// arguments, permission or resource exhaustion).
    #[error("Launch error [{tool}]: {message}")]
    Launch {
        /// Name of the executable that failed to launch.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// A node was used in violation of its lifecycle contract.
    #[error("Node error [{node}]: {message}")]
    Node {
        /// Name of the offending node.
        node: String,
        /// Human-readable error description.
        message: String,
    },

    /// Configuration data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for [`Error::Launch`].
    pub fn launch(tool: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Launch {
            tool: tool.into(),
            message: message.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Node`].
    pub fn node(node: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Node {
            node: node.into(),
            message: message.to_string(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
