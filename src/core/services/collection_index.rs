//! Collection Index (C4): a fast-path summary rebuilt from the union of
//! band files (§4.4). Contains nothing that cannot be recomputed.

use crate::core::domain::{BandSummary, CollectionIndex, CollectionStats};
use crate::core::errors::CoreError;
use crate::core::logging::log_index_rebuild;
use crate::core::services::atomic_writer::write_json_atomic;
use crate::core::services::band_store::BandStore;
use std::path::PathBuf;

pub const COLLECTION_INDEX_FILE_NAME: &str = ".collection_index.json";

pub struct CollectionIndexStore {
    root: PathBuf,
}

pub struct RebuildReport {
    pub index: CollectionIndex,
    pub excluded: Vec<(String, String)>,
}

impl CollectionIndexStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CollectionIndexStore { root: root.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(COLLECTION_INDEX_FILE_NAME)
    }

    pub fn load(&self) -> Result<CollectionIndex, CoreError> {
        let path = self.path();
        if !path.exists() {
            return Err(CoreError::NotFound("collection index".to_string()));
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| CoreError::Corrupt(format!("{}: {}", path.display(), e)))
    }

    /// Loads all band files (streaming one at a time), projects each to a
    /// summary, recomputes aggregates, and writes atomically. A corrupt
    /// band file is excluded and reported, not fatal (§4.4).
    pub fn rebuild(&self, store: &BandStore, now: &str) -> Result<RebuildReport, CoreError> {
        let names = store.list_band_names()?;
        let mut summaries = Vec::with_capacity(names.len());
        let mut excluded = Vec::new();
        let mut genre_counts: std::collections::BTreeMap<String, u32> = std::collections::BTreeMap::new();

        for name in names {
            match store.load(&name) {
                Ok(band) => {
                    let path = store.band_file_path(&name);
                    let content = std::fs::read_to_string(&path).unwrap_or_default();
                    let checksum = sha256_hex(content.as_bytes());
                    for genre in &band.genres {
                        *genre_counts.entry(genre.clone()).or_insert(0) += 1;
                    }
                    summaries.push(BandSummary {
                        name: band.band_name.clone(),
                        folder_path: band.folder_path.clone().unwrap_or_default(),
                        albums_count: band.total_albums() as u32,
                        local_albums_count: band.albums.len() as u32,
                        missing_albums_count: band.albums_missing.len() as u32,
                        has_metadata: band.has_metadata(),
                        has_analysis: band.has_analysis(),
                        last_updated: band.last_updated.clone(),
                        checksum,
                    });
                }
                Err(e) => excluded.push((name, e.to_string())),
            }
        }

        let stats = compute_stats(&summaries, &genre_counts);
        log_index_rebuild(summaries.len(), excluded.len());

        let index = CollectionIndex {
            bands: summaries,
            stats,
            last_updated: now.to_string(),
        };
        write_json_atomic(&self.path(), &index)?;

        Ok(RebuildReport { index, excluded })
    }
}

/// `stats` is always derivable from `bands` plus the band genre histogram
/// (invariant #4, §8); this is the one function that does so, used both by
/// rebuild and by anyone auditing an index for drift. `genre_counts` is a
/// band-name-weighted histogram (one count per band that carries the genre,
/// not per album) since `BandSummary` itself does not carry genres (§6.3).
pub fn compute_stats(
    bands: &[BandSummary],
    genre_counts: &std::collections::BTreeMap<String, u32>,
) -> CollectionStats {
    let total_bands = bands.len() as u32;
    let total_local_albums: u32 = bands.iter().map(|b| b.local_albums_count).sum();
    let total_missing_albums: u32 = bands.iter().map(|b| b.missing_albums_count).sum();
    let total_albums = total_local_albums + total_missing_albums;
    let bands_with_metadata = bands.iter().filter(|b| b.has_metadata).count() as u32;
    let completion_percentage = if total_albums == 0 {
        0.0
    } else {
        100.0 * total_local_albums as f64 / total_albums as f64
    };

    CollectionStats {
        total_bands,
        total_albums,
        total_local_albums,
        total_missing_albums,
        bands_with_metadata,
        completion_percentage,
        top_genres: genre_counts.clone(),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::locks::BandLocks;
    use crate::core::domain::Band;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn rebuild_on_empty_root_is_empty() {
        let dir = tempdir().unwrap();
        let store = BandStore::new(dir.path(), Arc::new(BandLocks::new()));
        let index_store = CollectionIndexStore::new(dir.path());
        let report = index_store.rebuild(&store, "2026-01-01T00:00:00Z").unwrap();
        assert_eq!(report.index.stats.total_bands, 0);
        assert!(index_store.path().exists());
    }

    #[test]
    fn stats_are_derived_from_summaries() {
        let dir = tempdir().unwrap();
        let store = BandStore::new(dir.path(), Arc::new(BandLocks::new()));
        let mut band = Band::new("Metallica");
        band.formed = "1981".to_string();
        store.save("Metallica", band, "2026-01-01T00:00:00Z").unwrap();

        let index_store = CollectionIndexStore::new(dir.path());
        let report = index_store.rebuild(&store, "2026-01-01T00:00:00Z").unwrap();
        assert_eq!(report.index.stats.total_bands, 1);
        assert_eq!(report.index.stats.bands_with_metadata, 1);
        assert_eq!(
            compute_stats(&report.index.bands, &std::collections::BTreeMap::new()),
            report.index.stats
        );
    }

    #[test]
    fn top_genres_counts_one_entry_per_band_carrying_that_genre() {
        let dir = tempdir().unwrap();
        let store = BandStore::new(dir.path(), Arc::new(BandLocks::new()));
        let mut metallica = Band::new("Metallica");
        metallica.genres = vec!["Thrash Metal".to_string()];
        store.save("Metallica", metallica, "2026-01-01T00:00:00Z").unwrap();
        let mut megadeth = Band::new("Megadeth");
        megadeth.genres = vec!["Thrash Metal".to_string(), "Speed Metal".to_string()];
        store.save("Megadeth", megadeth, "2026-01-01T00:00:00Z").unwrap();

        let index_store = CollectionIndexStore::new(dir.path());
        let report = index_store.rebuild(&store, "2026-01-01T00:00:00Z").unwrap();
        assert_eq!(report.index.stats.top_genres.get("Thrash Metal"), Some(&2));
        assert_eq!(report.index.stats.top_genres.get("Speed Metal"), Some(&1));
    }
}
