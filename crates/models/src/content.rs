//! Content similarity model.
//!
//! One document per movie (title + overview + genre names), vectorized
//! with TF-IDF, then condensed into a full pairwise cosine similarity
//! matrix. Seed queries sum similarity rows, which lets a user's whole
//! interaction history vote on every catalog movie at once.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, instrument};

use store::{MovieId, MovieRecord};

use crate::error::{ModelError, Result};
use crate::similarity::pairwise_cosine;
use crate::text::TfidfVectorizer;

/// Tuning knobs for content model training.
#[derive(Debug, Clone)]
pub struct ContentParams {
    /// Upper bound on TF-IDF vocabulary size, to bound memory
    pub max_features: usize,
}

impl Default for ContentParams {
    fn default() -> Self {
        Self { max_features: 5000 }
    }
}

/// Immutable trained content model.
///
/// `similarity` is a symmetric |M| × |M| matrix with 1.0 on the diagonal;
/// row and column order follows `movie_ids`.
#[derive(Debug)]
pub struct ContentModel {
    movie_ids: Vec<MovieId>,
    index: HashMap<MovieId, usize>,
    similarity: Vec<Vec<f32>>,
}

impl ContentModel {
    /// Train a model over the full catalog.
    ///
    /// Missing text fields are treated as empty strings; only an entirely
    /// empty catalog is an error.
    pub fn train(movies: &[MovieRecord], params: &ContentParams) -> Result<Self> {
        if movies.is_empty() {
            return Err(ModelError::EmptyCatalog);
        }

        let documents: Vec<String> = movies
            .iter()
            .map(|movie| {
                format!("{} {} {}", movie.title, movie.overview, movie.genres.join(" "))
            })
            .collect();

        let mut vectorizer = TfidfVectorizer::new(params.max_features);
        let vectors = vectorizer.fit_transform(&documents);
        let similarity = pairwise_cosine(&vectors);

        let movie_ids: Vec<MovieId> = movies.iter().map(|movie| movie.id).collect();
        let index = movie_ids
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos))
            .collect();

        info!(
            movies = movie_ids.len(),
            vocabulary = vectorizer.vocabulary_size(),
            "Trained content model"
        );

        Ok(Self {
            movie_ids,
            index,
            similarity,
        })
    }

    /// Number of movies in the model.
    pub fn len(&self) -> usize {
        self.movie_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movie_ids.is_empty()
    }

    /// Whether a movie was part of the training catalog.
    pub fn contains(&self, movie_id: MovieId) -> bool {
        self.index.contains_key(&movie_id)
    }

    /// Similarity between two movies, if both are in the model.
    pub fn similarity_between(&self, a: MovieId, b: MovieId) -> Option<f32> {
        let &i = self.index.get(&a)?;
        let &j = self.index.get(&b)?;
        Some(self.similarity[i][j])
    }

    /// Score every catalog movie against a set of seed movies.
    ///
    /// Each known seed adds its similarity row to the running scores;
    /// seeds the model never saw contribute nothing. The seeds themselves
    /// are excluded from the result. Returns up to `top_n` movies, best
    /// first, with ascending movie id as the tie-break.
    #[instrument(skip(self, seeds), fields(seeds = seeds.len()))]
    pub fn recommend(&self, seeds: &[MovieId], top_n: usize) -> Vec<(MovieId, f32)> {
        let mut scores = vec![0.0f32; self.movie_ids.len()];
        let mut known_seeds = 0usize;

        for seed in seeds {
            if let Some(&row) = self.index.get(seed) {
                known_seeds += 1;
                for (pos, sim) in self.similarity[row].iter().enumerate() {
                    scores[pos] += sim;
                }
            }
        }
        debug!(known_seeds, "Summed content similarity rows");

        let seed_set: HashSet<MovieId> = seeds.iter().copied().collect();
        let mut ranked: Vec<(MovieId, f32)> = self
            .movie_ids
            .iter()
            .zip(scores)
            .filter(|(id, _)| !seed_set.contains(id))
            .map(|(&id, score)| (id, score))
            .collect();

        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(top_n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId, title: &str, overview: &str, genres: &[&str]) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            overview: overview.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            popularity: 0.0,
            release_date: None,
        }
    }

    fn space_catalog() -> Vec<MovieRecord> {
        vec![
            movie(1, "Star Voyage", "astronauts explore deep space", &["Science Fiction"]),
            movie(2, "Galaxy Quest", "astronauts explore distant space stations", &["Science Fiction"]),
            movie(3, "Wedding Bells", "romantic comedy wedding disaster", &["Romance", "Comedy"]),
        ]
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let err = ContentModel::train(&[], &ContentParams::default()).unwrap_err();
        assert!(matches!(err, ModelError::EmptyCatalog));
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let model = ContentModel::train(&space_catalog(), &ContentParams::default()).unwrap();

        for &a in &[1, 2, 3] {
            assert_eq!(model.similarity_between(a, a), Some(1.0));
            for &b in &[1, 2, 3] {
                let ab = model.similarity_between(a, b).unwrap();
                let ba = model.similarity_between(b, a).unwrap();
                assert!((ab - ba).abs() < 1e-6);
                assert!((0.0..=1.0 + 1e-6).contains(&ab));
            }
        }
    }

    #[test]
    fn seed_query_prefers_textually_similar_movies() {
        let model = ContentModel::train(&space_catalog(), &ContentParams::default()).unwrap();

        let ranked = model.recommend(&[1], 10);
        // Seed itself excluded, sci-fi sibling first
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, 2);
        assert!(ranked[0].1 > ranked[1].1);
    }

    #[test]
    fn unknown_seeds_are_ignored() {
        let model = ContentModel::train(&space_catalog(), &ContentParams::default()).unwrap();

        let ranked = model.recommend(&[999], 10);
        // Query succeeds; every movie scores zero and all are returned
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|&(_, score)| score == 0.0));
    }

    #[test]
    fn movies_with_no_usable_text_still_train() {
        let catalog = vec![movie(1, "", "", &[]), movie(2, "", "", &[])];
        let model = ContentModel::train(&catalog, &ContentParams::default()).unwrap();

        assert_eq!(model.similarity_between(1, 1), Some(1.0));
        assert_eq!(model.similarity_between(1, 2), Some(0.0));
    }

    #[test]
    fn top_n_truncates_the_ranking() {
        let model = ContentModel::train(&space_catalog(), &ContentParams::default()).unwrap();
        assert_eq!(model.recommend(&[1], 1).len(), 1);
    }
}
