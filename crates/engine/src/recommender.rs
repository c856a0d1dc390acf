//! # Hybrid Recommender
//!
//! This module coordinates the whole recommendation flow:
//! 1. Collect the user's interaction history
//! 2. Query the collaborative and content models (lazily trained)
//! 3. Merge the candidate lists under a 0.7 / 0.3 weighting
//! 4. Re-check history exclusion and deduplicate
//! 5. Back-fill from popularity up to the requested limit
//!
//! Every failure path degrades instead of propagating: a missing model
//! drops that signal, a store error drops to popularity, and the caller
//! always gets a plain list of movie ids.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use models::{
    popularity, CollaborativeModel, ContentModel, ContentParams, InteractionWeights,
};
use store::{CatalogStore, InteractionStore, MovieId, UserId};

use crate::slot::ModelSlot;

/// Tuning knobs for the hybrid merge.
///
/// The signal weights and the interaction weight table are production
/// constants carried over as configuration; nothing here is derived.
#[derive(Debug, Clone)]
pub struct HybridConfig {
    /// Score contribution of a collaborative candidate (stronger prior:
    /// it reflects actual peer behavior)
    pub collaborative_weight: f32,
    /// Score contribution of a content candidate (cold-start-friendly
    /// secondary signal)
    pub content_weight: f32,
    /// Hard server-side cap on the result size, whatever the caller asks
    pub max_limit: usize,
    /// Content model training parameters
    pub content: ContentParams,
    /// Interaction kind weight table
    pub interaction: InteractionWeights,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            collaborative_weight: 0.7,
            content_weight: 0.3,
            max_limit: 50,
            content: ContentParams::default(),
            interaction: InteractionWeights::default(),
        }
    }
}

/// The hybrid recommendation engine.
///
/// Holds the store seams plus one atomic snapshot slot per model. Shared
/// across request-handling threads behind an `Arc`; all query paths take
/// `&self`.
pub struct Recommender {
    catalog: Arc<dyn CatalogStore>,
    interactions: Arc<dyn InteractionStore>,
    config: HybridConfig,
    content: ModelSlot<ContentModel>,
    collaborative: ModelSlot<CollaborativeModel>,
}

impl Recommender {
    /// Create a recommender with default configuration.
    pub fn new(catalog: Arc<dyn CatalogStore>, interactions: Arc<dyn InteractionStore>) -> Self {
        Self::with_config(catalog, interactions, HybridConfig::default())
    }

    /// Create a recommender with explicit configuration.
    pub fn with_config(
        catalog: Arc<dyn CatalogStore>,
        interactions: Arc<dyn InteractionStore>,
        config: HybridConfig,
    ) -> Self {
        Self {
            catalog,
            interactions,
            config,
            content: ModelSlot::new(),
            collaborative: ModelSlot::new(),
        }
    }

    /// Main entry point: ranked movie ids for a user.
    ///
    /// Never fails and never returns a movie from the user's own history;
    /// quality degrades silently down to popularity ranking when models
    /// or stores are unavailable. `limit` is clamped server-side.
    #[instrument(skip(self))]
    pub fn recommend_for_user(&self, user_id: UserId, limit: usize) -> Vec<MovieId> {
        let limit = limit.min(self.config.max_limit);
        if limit == 0 {
            return Vec::new();
        }

        match self.personalized(user_id, limit) {
            Ok(ranked) => ranked,
            Err(error) => {
                warn!(user_id, %error, "Personalized ranking failed, degrading to popularity");
                self.popularity_ranked(limit)
            }
        }
    }

    /// Popularity ranking, the unconditional fallback.
    ///
    /// Only an unreachable catalog produces an empty list here, and that
    /// is logged rather than surfaced.
    pub fn popularity_ranked(&self, limit: usize) -> Vec<MovieId> {
        let limit = limit.min(self.config.max_limit);
        match self.catalog.all_movies() {
            Ok(movies) => popularity::rank(&movies, limit),
            Err(error) => {
                warn!(%error, "Catalog unavailable for popularity ranking");
                Vec::new()
            }
        }
    }

    /// Rebuild both models from current store data.
    ///
    /// Returns true only if both builds succeed. A failed build is logged
    /// and leaves that model's previous snapshot (if any) installed, so
    /// partial success still yields one usable model.
    pub fn train_models(&self) -> bool {
        let content_ok = match self.content.rebuild(|| self.train_content()) {
            Ok(model) => {
                info!(movies = model.len(), "Content model rebuilt");
                true
            }
            Err(error) => {
                warn!(%error, "Content model rebuild failed");
                false
            }
        };

        let collaborative_ok = match self.collaborative.rebuild(|| self.train_collaborative()) {
            Ok(model) => {
                info!(users = model.user_count(), "Collaborative model rebuilt");
                true
            }
            Err(error) => {
                warn!(%error, "Collaborative model rebuild failed");
                false
            }
        };

        content_ok && collaborative_ok
    }

    /// The personalized path; any error here degrades to popularity.
    fn personalized(&self, user_id: UserId, limit: usize) -> Result<Vec<MovieId>> {
        let history: HashSet<MovieId> = self
            .interactions
            .interactions_for_user(user_id)
            .context("failed to read interaction history")?
            .iter()
            .map(|record| record.movie_id)
            .collect();

        if history.is_empty() {
            debug!(user_id, "No interaction history, using popularity ranking");
            return Ok(self.popularity_ranked(limit));
        }

        let collaborative = self.collaborative_candidates(user_id, limit);
        let seeds: Vec<MovieId> = history.iter().copied().collect();
        let content = self.content_candidates(&seeds, limit);
        debug!(
            collaborative = collaborative.len(),
            content = content.len(),
            "Gathered candidates"
        );

        // Membership-weighted merge: a movie on both lists sums both
        // contributions, which is the cross-signal tie-break
        let mut combined: HashMap<MovieId, f32> = HashMap::new();
        for &movie_id in &collaborative {
            *combined.entry(movie_id).or_insert(0.0) += self.config.collaborative_weight;
        }
        for &movie_id in &content {
            *combined.entry(movie_id).or_insert(0.0) += self.config.content_weight;
        }

        let mut ranked: Vec<(MovieId, f32)> = combined.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        // The models already exclude history; the ranker re-checks anyway
        let mut selected: Vec<MovieId> = Vec::with_capacity(limit);
        let mut seen: HashSet<MovieId> = HashSet::new();
        for (movie_id, _) in ranked {
            if history.contains(&movie_id) || !seen.insert(movie_id) {
                continue;
            }
            selected.push(movie_id);
            if selected.len() == limit {
                return Ok(selected);
            }
        }

        // Back-fill from popularity until the limit or the catalog runs out
        let movies = self
            .catalog
            .all_movies()
            .context("failed to read catalog for back-fill")?;
        let catalog_size = movies.len();
        for movie_id in popularity::rank(&movies, catalog_size) {
            if history.contains(&movie_id) || !seen.insert(movie_id) {
                continue;
            }
            selected.push(movie_id);
            if selected.len() == limit {
                break;
            }
        }

        Ok(selected)
    }

    /// Collaborative candidates, or empty when the model is unavailable.
    fn collaborative_candidates(&self, user_id: UserId, limit: usize) -> Vec<MovieId> {
        let model = match self.collaborative.ensure(|| self.train_collaborative()) {
            Ok(model) => model,
            Err(error) => {
                warn!(%error, "Collaborative model unavailable");
                return Vec::new();
            }
        };
        model
            .recommend(user_id, limit)
            .into_iter()
            .map(|(movie_id, _)| movie_id)
            .collect()
    }

    /// Content candidates seeded by the user's history, or empty when the
    /// model is unavailable.
    fn content_candidates(&self, seeds: &[MovieId], limit: usize) -> Vec<MovieId> {
        let model = match self.content.ensure(|| self.train_content()) {
            Ok(model) => model,
            Err(error) => {
                warn!(%error, "Content model unavailable");
                return Vec::new();
            }
        };
        model
            .recommend(seeds, limit)
            .into_iter()
            .map(|(movie_id, _)| movie_id)
            .collect()
    }

    fn train_content(&self) -> models::Result<ContentModel> {
        let movies = self.catalog.all_movies()?;
        ContentModel::train(&movies, &self.config.content)
    }

    fn train_collaborative(&self) -> models::Result<CollaborativeModel> {
        let records = self.interactions.all_interactions()?;
        CollaborativeModel::train(&records, &self.config.interaction)
    }
}
