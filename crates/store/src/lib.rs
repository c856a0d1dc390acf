//! # Store Crate
//!
//! Domain types and data-access seams for the recommendation engine.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, InteractionRecord, InteractionKind)
//! - **traits**: The CatalogStore / InteractionStore seams the engine reads through
//! - **memory**: In-memory store implementations for the CLI harness and tests
//! - **loader**: JSON dataset loader
//! - **error**: Error types for data access
//!
//! ## Example Usage
//!
//! ```ignore
//! use store::{load_dataset, CatalogStore};
//! use std::path::Path;
//!
//! let (catalog, interactions) = load_dataset(Path::new("data/sample"))?;
//! let movies = catalog.all_movies()?;
//! println!("{} movies in catalog", movies.len());
//! ```

// Public modules
pub mod error;
pub mod loader;
pub mod memory;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{Result, StoreError};
pub use loader::load_dataset;
pub use memory::{MemoryCatalog, MemoryInteractions};
pub use traits::{CatalogStore, InteractionStore};
pub use types::{InteractionKind, InteractionRecord, MovieId, MovieRecord, UserId};
