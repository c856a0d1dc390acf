//! Error types for model training.

use thiserror::Error;

/// Why a model could not be (re)built.
///
/// The no-data variants are expected operational states, not bugs: the
/// engine maps them to its popularity fallback instead of surfacing them.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The catalog has no movies, so there is nothing to vectorize
    #[error("cannot train content model: catalog is empty")]
    EmptyCatalog,

    /// The interaction log is empty, so no user rows exist
    #[error("cannot train collaborative model: no interactions recorded")]
    NoInteractions,

    /// The backing store failed while training data was being read
    #[error("store error during training: {0}")]
    Store(#[from] store::StoreError),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ModelError>;
