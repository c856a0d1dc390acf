//! Core domain types for the movie catalog.
//!
//! This module defines the records the recommendation engine consumes:
//! - Type aliases for domain clarity (UserId, MovieId)
//! - MovieRecord: one catalog entry, owned by the ingestion side
//! - InteractionKind / InteractionRecord: the append-only interaction log

use serde::{Deserialize, Serialize};

/// Unique identifier for a user (externally assigned)
pub type UserId = u32;

/// Unique identifier for a movie (externally assigned, e.g. TMDB id)
pub type MovieId = u32;

/// One movie in the catalog.
///
/// All fields besides `id` and `title` are optional upstream, so they
/// deserialize with defaults: a missing overview is an empty string,
/// a missing genre list is empty, missing popularity is 0.0. The engine
/// treats records as read-only and only copies them for the duration of
/// one model build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    /// Free-text plot summary
    #[serde(default)]
    pub overview: String,
    /// Ordered list of genre names (e.g. "Science Fiction")
    #[serde(default)]
    pub genres: Vec<String>,
    /// Non-negative popularity score maintained by the ingestion side
    #[serde(default)]
    pub popularity: f32,
    /// Release date as an ISO-8601 string, when known
    #[serde(default)]
    pub release_date: Option<String>,
}

/// The closed set of interaction signals the engine understands.
///
/// Serde rejects any other kind string at ingestion, so an unknown
/// signal can never reach the similarity math with a silent zero weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Liked,
    Watchlisted,
    Commented,
}

impl InteractionKind {
    /// All kinds, in descending signal strength.
    pub const ALL: [InteractionKind; 3] = [
        InteractionKind::Liked,
        InteractionKind::Watchlisted,
        InteractionKind::Commented,
    ];
}

/// One record in the append-only interaction log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub kind: InteractionKind,
    /// Unix timestamp of the interaction
    pub timestamp: i64,
}
