//! Error types for the store crate.

use thiserror::Error;

/// Errors that can occur while reading catalog or interaction data.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error while reading a dataset file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset file exists but does not parse as the expected JSON shape
    #[error("Malformed dataset file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backing store could not be reached.
    ///
    /// In-memory stores never produce this; it exists so remote-backed
    /// implementations of the store traits have a transient failure to
    /// report, and so the engine's degradation paths can be exercised.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, StoreError>;
