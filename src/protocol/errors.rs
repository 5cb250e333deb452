//! Error types for the protocol store

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or querying protocols
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Failed to parse the store
    #[error("Failed to parse protocol store: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Failed to read or write the store
    #[error("Failed to access protocol store {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No protocol with this name
    #[error("Protocol '{0}' not found")]
    NotFound(String),

    /// Protocol without drugs
    #[error("Protocol '{0}' has no drugs")]
    EmptyDrugList(String),
}

impl ProtocolError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
