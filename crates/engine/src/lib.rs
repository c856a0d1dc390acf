//! Engine crate for the hybrid movie recommender.
//!
//! Builds on `store` (data seams) and `models` (trained similarity
//! structures) and exposes the three-call surface the serving layer uses:
//! `recommend_for_user`, `popularity_ranked`, `train_models`.

pub mod recommender;

mod slot;

pub use recommender::{HybridConfig, Recommender};
