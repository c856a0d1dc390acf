//! # Models Crate
//!
//! The two trainable similarity models plus the popularity ranking.
//!
//! ## Components
//!
//! ### Content model
//! TF-IDF over each movie's title, overview and genre names, condensed
//! into a pairwise cosine similarity matrix. Seeded with a user's history
//! to score every catalog movie.
//!
//! ### Collaborative model
//! Interaction records (liked / watchlisted / commented, weighted 5/3/2)
//! folded into a user × movie weight matrix, with user-to-user cosine
//! similarity on top. Scores movies by what similar users did.
//!
//! ### Popularity
//! Stable descending sort on the catalog popularity field; the fallback
//! every other path degrades to.
//!
//! Models are plain immutable values once trained. Snapshot management
//! and rebuild serialization live in the `engine` crate.

// Public modules
pub mod collaborative;
pub mod content;
pub mod error;
pub mod popularity;
pub mod similarity;
pub mod text;

// Re-export commonly used types
pub use collaborative::{CollaborativeModel, InteractionWeights};
pub use content::{ContentModel, ContentParams};
pub use error::{ModelError, Result};
