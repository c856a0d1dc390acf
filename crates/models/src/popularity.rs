//! Popularity ranking, the terminal fallback.
//!
//! The one ranking that needs no trained model: sort the catalog by its
//! popularity field, descending. A stable sort keeps catalog iteration
//! order for ties, so the result is reproducible run to run.

use store::{MovieId, MovieRecord};

/// Top `limit` movie ids by popularity, descending; ties keep catalog order.
pub fn rank(movies: &[MovieRecord], limit: usize) -> Vec<MovieId> {
    let mut ordered: Vec<(MovieId, f32)> =
        movies.iter().map(|movie| (movie.id, movie.popularity)).collect();

    // Vec::sort_by is stable, which is what makes the tie-break hold
    ordered.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    ordered
        .into_iter()
        .take(limit)
        .map(|(id, _)| id)
        .collect()
}
