//! Store seams the recommendation engine reads through.
//!
//! The engine never talks to a database directly; it consumes these two
//! traits. Both are object-safe and `Send + Sync` so a single store can be
//! shared across request-handling threads behind an `Arc`.

use crate::error::Result;
use crate::types::{InteractionRecord, MovieId, MovieRecord, UserId};

/// Read-only view of the movie catalog.
///
/// ## Design Note
/// Lookups are keyed accesses on the movie id, never queries assembled
/// from formatted identifier strings.
pub trait CatalogStore: Send + Sync {
    /// All catalog movies, in stable catalog iteration order.
    ///
    /// That order is the tie-break for popularity ranking, so
    /// implementations must return the same order on every call.
    fn all_movies(&self) -> Result<Vec<MovieRecord>>;

    /// Look up a single movie by id.
    fn movie(&self, id: MovieId) -> Result<Option<MovieRecord>>;
}

/// Read-only view of the append-only interaction log.
pub trait InteractionStore: Send + Sync {
    /// Every recorded interaction, across all users.
    fn all_interactions(&self) -> Result<Vec<InteractionRecord>>;

    /// All interactions recorded for one user.
    ///
    /// Returns an empty vec for an unknown user; that is a normal
    /// no-data condition, not an error.
    fn interactions_for_user(&self, user_id: UserId) -> Result<Vec<InteractionRecord>>;
}
