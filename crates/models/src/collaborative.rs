//! Collaborative similarity model.
//!
//! Interactions are folded into a user × movie weight matrix, and users
//! are compared by the cosine similarity of their weight rows: two users
//! who like and watchlist the same movies point the same way regardless
//! of how active they are.
//!
//! ## Weight aggregation
//! Each interaction kind carries a fixed base weight. Observations of the
//! same kind for one (user, movie) pair are averaged, so duplicate records
//! cannot inflate the weight; when several kinds touch the same pair the
//! strongest per-kind average wins.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info, instrument};

use store::{InteractionKind, InteractionRecord, MovieId, UserId};

use crate::error::{ModelError, Result};
use crate::similarity::pairwise_cosine;

/// Guard against a near-zero similarity denominator.
const EPSILON: f32 = 1e-10;

/// Base weight per interaction kind.
///
/// Defaults preserve the production values (explicit positive action >
/// passive intent > incidental engagement); they are configuration, not
/// derived quantities.
#[derive(Debug, Clone)]
pub struct InteractionWeights {
    pub liked: f32,
    pub watchlisted: f32,
    pub commented: f32,
}

impl Default for InteractionWeights {
    fn default() -> Self {
        Self {
            liked: 5.0,
            watchlisted: 3.0,
            commented: 2.0,
        }
    }
}

impl InteractionWeights {
    pub fn weight_for(&self, kind: InteractionKind) -> f32 {
        match kind {
            InteractionKind::Liked => self.liked,
            InteractionKind::Watchlisted => self.watchlisted,
            InteractionKind::Commented => self.commented,
        }
    }
}

/// Immutable trained collaborative model.
///
/// Axes are sorted ascending so retraining on the same data reproduces
/// the same matrices. Only users and movies with at least one interaction
/// appear.
#[derive(Debug)]
pub struct CollaborativeModel {
    user_ids: Vec<UserId>,
    movie_ids: Vec<MovieId>,
    user_index: HashMap<UserId, usize>,
    /// |U| × |N| aggregated interaction weights, 0.0 for untouched pairs
    weights: Vec<Vec<f32>>,
    /// |U| × |U| cosine similarity between weight rows
    user_similarity: Vec<Vec<f32>>,
}

impl CollaborativeModel {
    /// Train a model from the full interaction log.
    pub fn train(records: &[InteractionRecord], weights: &InteractionWeights) -> Result<Self> {
        if records.is_empty() {
            return Err(ModelError::NoInteractions);
        }

        // (user, movie) -> kind -> (sum of observed weights, count)
        let mut pairs: BTreeMap<(UserId, MovieId), HashMap<InteractionKind, (f32, u32)>> =
            BTreeMap::new();
        let mut movie_set: BTreeSet<MovieId> = BTreeSet::new();

        for record in records {
            let observed = weights.weight_for(record.kind);
            let per_kind = pairs
                .entry((record.user_id, record.movie_id))
                .or_default()
                .entry(record.kind)
                .or_insert((0.0, 0));
            per_kind.0 += observed;
            per_kind.1 += 1;
            movie_set.insert(record.movie_id);
        }

        let movie_ids: Vec<MovieId> = movie_set.into_iter().collect();
        let movie_index: HashMap<MovieId, usize> = movie_ids
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos))
            .collect();

        let user_set: BTreeSet<UserId> = pairs.keys().map(|&(user, _)| user).collect();
        let user_ids: Vec<UserId> = user_set.into_iter().collect();
        let user_index: HashMap<UserId, usize> = user_ids
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos))
            .collect();

        let mut matrix = vec![vec![0.0f32; movie_ids.len()]; user_ids.len()];
        for ((user, movie), per_kind) in &pairs {
            // Average within each kind, then keep the strongest signal
            let weight = per_kind
                .values()
                .map(|&(sum, count)| sum / count as f32)
                .fold(0.0f32, f32::max);
            matrix[user_index[user]][movie_index[movie]] = weight;
        }

        let user_similarity = pairwise_cosine(&matrix);

        info!(
            users = user_ids.len(),
            movies = movie_ids.len(),
            interactions = records.len(),
            "Trained collaborative model"
        );

        Ok(Self {
            user_ids,
            movie_ids,
            user_index,
            weights: matrix,
            user_similarity,
        })
    }

    /// Number of users in the model.
    pub fn user_count(&self) -> usize {
        self.user_ids.len()
    }

    /// Whether the user had any interactions at training time.
    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.user_index.contains_key(&user_id)
    }

    /// Aggregated weight for one (user, movie) pair, if both are modeled.
    pub fn weight_of(&self, user_id: UserId, movie_id: MovieId) -> Option<f32> {
        let &row = self.user_index.get(&user_id)?;
        let col = self.movie_ids.binary_search(&movie_id).ok()?;
        Some(self.weights[row][col])
    }

    /// Recommend movies for one user from their neighbors' behavior.
    ///
    /// An unmodeled user yields an empty result (the caller falls back).
    /// Otherwise every movie is scored as the similarity-weighted sum of
    /// all users' weights, normalized by total similarity; movies the
    /// target already touched are excluded. Returns up to `top_n` movies,
    /// best first, ascending movie id as the tie-break.
    #[instrument(skip(self))]
    pub fn recommend(&self, user_id: UserId, top_n: usize) -> Vec<(MovieId, f32)> {
        let Some(&target) = self.user_index.get(&user_id) else {
            debug!("User absent from collaborative model");
            return Vec::new();
        };

        let sims = &self.user_similarity[target];
        let denominator: f32 = sims.iter().sum::<f32>() + EPSILON;

        let mut scores = vec![0.0f32; self.movie_ids.len()];
        for (other, row) in self.weights.iter().enumerate() {
            let sim = sims[other];
            if sim == 0.0 {
                continue;
            }
            for (pos, weight) in row.iter().enumerate() {
                scores[pos] += sim * weight;
            }
        }

        let own_row = &self.weights[target];
        let mut ranked: Vec<(MovieId, f32)> = self
            .movie_ids
            .iter()
            .zip(scores)
            .enumerate()
            .filter(|&(pos, _)| own_row[pos] == 0.0)
            .map(|(_, (&id, score))| (id, score / denominator))
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

    fn record(user_id: UserId, movie_id: MovieId, kind: InteractionKind) -> InteractionRecord {
        InteractionRecord {
            user_id,
            movie_id,
            kind,
            timestamp: 0,
        }
    }

    #[test]
    fn empty_log_is_an_error() {
        let err = CollaborativeModel::train(&[], &InteractionWeights::default()).unwrap_err();
        assert!(matches!(err, ModelError::NoInteractions));
    }

    #[test]
    fn duplicate_likes_do_not_double_the_weight() {
        // Two likes average to 5.0; the watchlist signal (3.0) is weaker
        let records = vec![
            record(1, 10, InteractionKind::Liked),
            record(1, 10, InteractionKind::Liked),
            record(1, 10, InteractionKind::Watchlisted),
        ];
        let model = CollaborativeModel::train(&records, &InteractionWeights::default()).unwrap();

        assert_eq!(model.weight_of(1, 10), Some(5.0));
    }

    #[test]
    fn kind_weights_follow_the_configured_table() {
        let records = vec![
            record(1, 10, InteractionKind::Liked),
            record(1, 20, InteractionKind::Watchlisted),
            record(1, 30, InteractionKind::Commented),
        ];
        let model = CollaborativeModel::train(&records, &InteractionWeights::default()).unwrap();

        assert_eq!(model.weight_of(1, 10), Some(5.0));
        assert_eq!(model.weight_of(1, 20), Some(3.0));
        assert_eq!(model.weight_of(1, 30), Some(2.0));
    }

    #[test]
    fn users_without_interactions_never_appear() {
        let records = vec![record(1, 10, InteractionKind::Liked)];
        let model = CollaborativeModel::train(&records, &InteractionWeights::default()).unwrap();

        assert_eq!(model.user_count(), 1);
        assert!(model.contains_user(1));
        assert!(!model.contains_user(2));
    }

    #[test]
    fn unmodeled_user_gets_an_empty_result() {
        let records = vec![record(1, 10, InteractionKind::Liked)];
        let model = CollaborativeModel::train(&records, &InteractionWeights::default()).unwrap();

        assert!(model.recommend(99, 10).is_empty());
    }

    #[test]
    fn lone_user_has_nothing_left_to_recommend() {
        // Every movie the model knows is already in the user's history
        let records = vec![
            record(1, 10, InteractionKind::Liked),
            record(1, 20, InteractionKind::Watchlisted),
        ];
        let model = CollaborativeModel::train(&records, &InteractionWeights::default()).unwrap();

        assert!(model.recommend(1, 10).is_empty());
    }

    #[test]
    fn neighbors_surface_movies_the_target_has_not_touched() {
        // Users 1 and 2 agree on movies 10 and 20; user 2 also liked 30
        let records = vec![
            record(1, 10, InteractionKind::Liked),
            record(1, 20, InteractionKind::Liked),
            record(2, 10, InteractionKind::Liked),
            record(2, 20, InteractionKind::Liked),
            record(2, 30, InteractionKind::Liked),
            // User 3 is off in their own corner
            record(3, 40, InteractionKind::Commented),
        ];
        let model = CollaborativeModel::train(&records, &InteractionWeights::default()).unwrap();

        let ranked = model.recommend(1, 10);
        assert!(!ranked.is_empty());
        assert_eq!(ranked[0].0, 30);
        // History never leaks into the result
        assert!(ranked.iter().all(|&(id, _)| id != 10 && id != 20));
    }

    #[test]
    fn retraining_on_identical_data_is_deterministic() {
        let records = vec![
            record(2, 20, InteractionKind::Watchlisted),
            record(1, 10, InteractionKind::Liked),
            record(2, 10, InteractionKind::Liked),
            record(1, 30, InteractionKind::Commented),
        ];
        let weights = InteractionWeights::default();

        let first = CollaborativeModel::train(&records, &weights).unwrap();
        let second = CollaborativeModel::train(&records, &weights).unwrap();

        assert_eq!(first.user_ids, second.user_ids);
        assert_eq!(first.movie_ids, second.movie_ids);
        assert_eq!(first.recommend(1, 10), second.recommend(1, 10));
    }
}
