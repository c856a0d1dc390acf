//! JSON dataset loader.
//!
//! The production system feeds the catalog and the interaction log from
//! its own ingestion pipeline; for the CLI harness and offline experiments
//! the same data is loaded from two JSON files in a dataset directory:
//!
//! - `movies.json`: array of MovieRecord
//! - `interactions.json`: array of InteractionRecord
//!
//! Unknown interaction kinds fail the load outright rather than being
//! dropped, so a bad export is caught at ingestion.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{Result, StoreError};
use crate::memory::{MemoryCatalog, MemoryInteractions};
use crate::types::{InteractionRecord, MovieRecord};

/// Read one JSON array file into a Vec of records.
fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| StoreError::Malformed {
        path: path.display().to_string(),
        source,
    })
}

/// Load a full dataset directory into in-memory stores.
///
/// The two files are independent, so they are parsed in parallel.
pub fn load_dataset(dir: &Path) -> Result<(MemoryCatalog, MemoryInteractions)> {
    let movies_path = dir.join("movies.json");
    let interactions_path = dir.join("interactions.json");

    let (movies, interactions) = rayon::join(
        || read_json_file::<MovieRecord>(&movies_path),
        || read_json_file::<InteractionRecord>(&interactions_path),
    );
    let movies = movies?;
    let interactions = interactions?;

    info!(
        movies = movies.len(),
        interactions = interactions.len(),
        "Loaded dataset from {}",
        dir.display()
    );

    Ok((
        MemoryCatalog::from_movies(movies),
        MemoryInteractions::from_records(interactions),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn loads_a_small_dataset() {
        let dir = std::env::temp_dir().join("store-loader-ok");
        std::fs::create_dir_all(&dir).unwrap();

        write_file(
            &dir,
            "movies.json",
            r#"[
                {"id": 1, "title": "Alien", "overview": "In space", "genres": ["Horror", "Science Fiction"], "popularity": 8.5},
                {"id": 2, "title": "Heat", "popularity": 6.1}
            ]"#,
        );
        write_file(
            &dir,
            "interactions.json",
            r#"[
                {"user_id": 1, "movie_id": 1, "kind": "liked", "timestamp": 1700000000},
                {"user_id": 1, "movie_id": 2, "kind": "commented", "timestamp": 1700000001}
            ]"#,
        );

        let (catalog, interactions) = load_dataset(&dir).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(interactions.len(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = std::env::temp_dir().join("store-loader-missing");
        std::fs::create_dir_all(&dir).unwrap();
        // No files written

        let err = load_dataset(&dir).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn unknown_interaction_kind_fails_the_load() {
        let dir = std::env::temp_dir().join("store-loader-badkind");
        std::fs::create_dir_all(&dir).unwrap();

        write_file(&dir, "movies.json", r#"[{"id": 1, "title": "Alien"}]"#);
        write_file(
            &dir,
            "interactions.json",
            r#"[{"user_id": 1, "movie_id": 1, "kind": "viewed", "timestamp": 0}]"#,
        );

        let err = load_dataset(&dir).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }
}
