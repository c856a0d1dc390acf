//! In-memory implementations of the store seams.
//!
//! These back the CLI harness and the test suites. Writes happen during
//! setup (dataset load, test fixtures); afterwards the stores are shared
//! read-only behind an `Arc`.

use std::collections::HashMap;

use crate::error::Result;
use crate::traits::{CatalogStore, InteractionStore};
use crate::types::{InteractionRecord, MovieId, MovieRecord, UserId};

/// Catalog held entirely in memory.
///
/// Insertion order is preserved and defines catalog iteration order;
/// a HashMap on the side gives O(1) lookups by id.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    movies: Vec<MovieRecord>,
    by_id: HashMap<MovieId, usize>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from an ordered list of records.
    pub fn from_movies(movies: Vec<MovieRecord>) -> Self {
        let mut catalog = Self::new();
        for movie in movies {
            catalog.insert(movie);
        }
        catalog
    }

    /// Insert a movie, replacing any previous record with the same id.
    pub fn insert(&mut self, movie: MovieRecord) {
        match self.by_id.get(&movie.id) {
            Some(&pos) => self.movies[pos] = movie,
            None => {
                self.by_id.insert(movie.id, self.movies.len());
                self.movies.push(movie);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

impl CatalogStore for MemoryCatalog {
    fn all_movies(&self) -> Result<Vec<MovieRecord>> {
        Ok(self.movies.clone())
    }

    fn movie(&self, id: MovieId) -> Result<Option<MovieRecord>> {
        Ok(self.by_id.get(&id).map(|&pos| self.movies[pos].clone()))
    }
}

/// Interaction log held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryInteractions {
    records: Vec<InteractionRecord>,
    /// Positions into `records`, per user
    by_user: HashMap<UserId, Vec<usize>>,
}

impl MemoryInteractions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<InteractionRecord>) -> Self {
        let mut log = Self::new();
        for record in records {
            log.record(record);
        }
        log
    }

    /// Append one interaction to the log.
    pub fn record(&mut self, record: InteractionRecord) {
        self.by_user
            .entry(record.user_id)
            .or_default()
            .push(self.records.len());
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl InteractionStore for MemoryInteractions {
    fn all_interactions(&self) -> Result<Vec<InteractionRecord>> {
        Ok(self.records.clone())
    }

    fn interactions_for_user(&self, user_id: UserId) -> Result<Vec<InteractionRecord>> {
        Ok(self
            .by_user
            .get(&user_id)
            .map(|positions| positions.iter().map(|&pos| self.records[pos]).collect())
            .unwrap_or_default())
    }
}
