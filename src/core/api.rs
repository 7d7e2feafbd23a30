//! Core API Surface (C8, §4.8): the nine operations exposed to the
//! transport. Every call is a thin orchestration over C1-C7; nothing here
//! touches the filesystem directly.

use crate::core::cancellation::CancellationToken;
use crate::core::domain::{Band, BandAnalysis, CollectionIndex, CollectionInsights};
use crate::core::errors::CoreError;
use crate::core::locks::BandLocks;
use crate::core::logging::{log_error_with_context, log_scan_band_error, log_scan_operation};
use crate::core::services::analytics::compute_insights;
use crate::core::services::band_store::{BandStore, SaveReport};
use crate::core::services::collection_index::CollectionIndexStore;
use crate::core::services::query::{
    AlbumSearchFilters, BandFilters, PagedBandList, Pagination, SortKey, SortOrder, search_albums,
};
use crate::core::domain::AlbumView;
use crate::core::services::scanner::scan_root;
use crate::core::services::validation::{validate_invariants, ValidationReport};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ScanReport {
    pub bands_added: u32,
    pub bands_removed: u32,
    pub albums_changed: u32,
    pub band_errors: Vec<(String, String)>,
    /// Unrecognized album `"type"` strings found on existing band records
    /// touched by this scan (§3).
    pub type_warnings: Vec<String>,
}

/// The core API surface, holding the shared per-band lock table and the
/// music root. One instance is meant to own a music root for the lifetime
/// of a process (§5 "a single process owns the music root").
pub struct CollectionStore {
    root: PathBuf,
    band_store: BandStore,
    index_store: CollectionIndexStore,
}

impl CollectionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let locks = Arc::new(BandLocks::new());
        CollectionStore {
            band_store: BandStore::new(&root, locks),
            index_store: CollectionIndexStore::new(&root),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `Scan() → ScanReport` (§4.8): runs C2, applies deltas through C3 for
    /// every discovered band plus every previously-known band absent from
    /// this scan, then rebuilds C4. Per-band failures are recorded, not
    /// fatal (§7).
    ///
    /// `cancel` is checked before the filesystem walk and again before each
    /// band is applied (§5): on cancellation, no further band is touched and
    /// the index is not rebuilt. Bands already applied earlier in this same
    /// call remain on disk; cancellation stops the scan from going further,
    /// it does not roll back writes already made.
    pub fn scan(&self, now: &str, cancel: &CancellationToken) -> Result<ScanReport, CoreError> {
        let outcome = scan_root(&self.root, cancel)?;
        for (band_name, message) in &outcome.band_errors {
            log_scan_band_error(band_name, &CoreError::Io(message.clone()));
        }

        let previous_names: std::collections::HashSet<String> =
            self.band_store.list_band_names()?.into_iter().collect();
        let scanned_names: std::collections::HashSet<String> =
            outcome.bands.iter().map(|b| b.band_name.clone()).collect();

        let mut bands_added = 0u32;
        let mut albums_changed = 0u32;
        let mut type_warnings = Vec::new();

        for scan in &outcome.bands {
            if cancel.is_cancelled() {
                return Err(CoreError::Cancelled("scan cancelled while applying bands".to_string()));
            }
            let existed = previous_names.contains(&scan.band_name);
            match self.band_store.apply_scan(scan, now) {
                Ok(report) => {
                    if !existed {
                        bands_added += 1;
                    }
                    if report.changed {
                        albums_changed += 1;
                    }
                    type_warnings.extend(report.type_warnings);
                }
                Err(e) => log_scan_band_error(&scan.band_name, &e),
            }
        }

        let mut bands_removed = 0u32;
        for orphaned in previous_names.difference(&scanned_names) {
            if cancel.is_cancelled() {
                return Err(CoreError::Cancelled("scan cancelled while marking orphaned bands".to_string()));
            }
            match self.band_store.mark_orphaned(orphaned, now) {
                Ok(report) => {
                    bands_removed += 1;
                    if report.changed {
                        albums_changed += 1;
                    }
                    type_warnings.extend(report.type_warnings);
                }
                Err(e) => log_scan_band_error(orphaned, &e),
            }
        }

        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled("scan cancelled before index rebuild".to_string()));
        }
        self.index_store.rebuild(&self.band_store, now)?;
        log_scan_operation(&self.root, bands_added as usize, bands_removed as usize, albums_changed as usize);

        Ok(ScanReport {
            bands_added,
            bands_removed,
            albums_changed,
            band_errors: outcome.band_errors,
            type_warnings,
        })
    }

    /// The current collection index, rebuilding transparently if it is
    /// missing or corrupt (§7 "a missing or corrupt index causes a
    /// transparent rebuild attempt").
    pub fn collection_summary(&self, now: &str) -> Result<CollectionIndex, CoreError> {
        self.load_index_or_rebuild(now)
    }

    fn load_index_or_rebuild(&self, now: &str) -> Result<CollectionIndex, CoreError> {
        match self.index_store.load() {
            Ok(index) => Ok(index),
            Err(_) => {
                log_error_with_context("loading collection index", &CoreError::NotFound("index".to_string()));
                Ok(self.index_store.rebuild(&self.band_store, now)?.index)
            }
        }
    }

    /// `ListBands(filters, sort, page) → PagedBandList` (§4.5.1, §4.8).
    pub fn list_bands(
        &self,
        filters: &BandFilters,
        sort_key: SortKey,
        sort_order: SortOrder,
        pagination: Pagination,
        now: &str,
    ) -> Result<PagedBandList, CoreError> {
        let index = self.load_index_or_rebuild(now)?;
        let band_store = &self.band_store;
        Ok(crate::core::services::query::list_bands(
            &index.bands,
            |name| band_store.load(name).ok(),
            filters,
            sort_key,
            sort_order,
            pagination,
        ))
    }

    /// `SearchAlbums(filters) → AlbumSearchResult` (§4.5.2, §4.8).
    pub fn search_albums(&self, filters: &AlbumSearchFilters, now: &str) -> Result<Vec<AlbumView>, CoreError> {
        let names = self.band_store.list_band_names().or_else(|_| {
            self.load_index_or_rebuild(now)
                .map(|i| i.bands.into_iter().map(|b| b.name).collect())
        })?;
        let bands: Vec<Band> = names
            .iter()
            .filter_map(|n| self.band_store.load(n).ok())
            .collect();
        Ok(search_albums(&bands, filters))
    }

    /// `GetBand(name) → BandRecord | NotFound` (§4.8).
    pub fn get_band(&self, name: &str) -> Result<Band, CoreError> {
        self.band_store.load(name)
    }

    pub fn band_exists(&self, name: &str) -> bool {
        self.band_store.exists(name)
    }

    /// `SaveBandMetadata(name, record) → SaveReport` (§4.8): validates,
    /// saves, rebuilds the index so `stats` stays derivable (invariant #4).
    pub fn save_band_metadata(&self, name: &str, record: Band, now: &str) -> Result<SaveReport, CoreError> {
        let report = self.band_store.save(name, record, now)?;
        self.index_store.rebuild(&self.band_store, now)?;
        Ok(report)
    }

    /// `SaveBandAnalysis(name, analysis) → SaveReport` (§4.8).
    pub fn save_band_analysis(
        &self,
        name: &str,
        analysis: BandAnalysis,
        now: &str,
    ) -> Result<SaveReport, CoreError> {
        let report = self.band_store.save_analysis(name, analysis, now)?;
        self.index_store.rebuild(&self.band_store, now)?;
        Ok(report)
    }

    /// `SaveCollectionInsights(insights) → SaveReport` (§4.8): writes the
    /// optional `.collection_insight.json` sidecar (§6.1).
    pub fn save_collection_insights(
        &self,
        insights: &CollectionInsights,
    ) -> Result<crate::core::services::atomic_writer::WriteReport, CoreError> {
        let path = self.root.join(".collection_insight.json");
        crate::core::services::atomic_writer::write_json_atomic(&path, insights)
    }

    /// `ValidateBandMetadata(name, record) → ValidationReport` (§4.8): dry
    /// run, never writes. `raw` is the caller's original JSON so field-level
    /// mistakes (wrong name, wrong shape) can be reported before a typed
    /// `Band` is even attempted.
    pub fn validate_band_metadata(&self, name: &str, raw: &Value) -> ValidationReport {
        let mut report = crate::core::services::validation::validate_raw_record(name, raw);
        if let Ok(band) = serde_json::from_value::<Band>(raw.clone()) {
            let invariant_issues = validate_invariants(&band);
            report.valid = report.valid && invariant_issues.is_empty();
            report.issues.extend(invariant_issues);
        }
        report
    }

    /// `Analytics() → CollectionInsights` (§4.6, §4.8).
    pub fn analytics(&self, now: &str) -> Result<CollectionInsights, CoreError> {
        let names = self.band_store.list_band_names()?;
        let bands: Vec<Band> = names
            .iter()
            .filter_map(|n| self.band_store.load(n).ok())
            .collect();
        let index = self.load_index_or_rebuild(now)?;
        Ok(compute_insights(&bands, &index.stats, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn scenario_s1_empty_root() {
        let dir = tempdir().unwrap();
        let store = CollectionStore::new(dir.path());
        let report = store.scan("2026-01-01T00:00:00Z", &CancellationToken::new()).unwrap();
        assert_eq!(report.bands_added, 0);
        assert_eq!(report.bands_removed, 0);
        assert_eq!(report.albums_changed, 0);
        let index = store.index_store.load().unwrap();
        assert_eq!(index.stats.total_bands, 0);
    }

    #[test]
    fn scenario_s2_scan_creates_one_band_one_album() {
        let dir = tempdir().unwrap();
        let album_dir = dir
            .path()
            .join("Pink Floyd")
            .join("1973 - The Dark Side of the Moon");
        for i in 1..=10 {
            touch(&album_dir.join(format!("{:02}.mp3", i)));
        }

        let store = CollectionStore::new(dir.path());
        store.scan("2026-01-01T00:00:00Z", &CancellationToken::new()).unwrap();

        let band = store.get_band("Pink Floyd").unwrap();
        assert_eq!(band.albums.len(), 1);
        assert_eq!(band.albums[0].album_name, "The Dark Side of the Moon");
        assert_eq!(band.albums[0].year, "1973");
        assert_eq!(band.albums[0].track_count, 10);
        assert!(
            dir.path()
                .join("Pink Floyd")
                .join(".band_metadata.json")
                .exists()
        );
    }

    #[test]
    fn scenario_s3_analysis_is_visible_through_get_band() {
        let dir = tempdir().unwrap();
        touch(
            &dir.path()
                .join("Pink Floyd")
                .join("1973 - The Dark Side of the Moon")
                .join("01.mp3"),
        );
        let store = CollectionStore::new(dir.path());
        store.scan("2026-01-01T00:00:00Z", &CancellationToken::new()).unwrap();

        store
            .save_band_analysis(
                "Pink Floyd",
                BandAnalysis {
                    review: String::new(),
                    rate: 0,
                    similar_bands: vec![],
                    albums: vec![crate::core::domain::AlbumAnalysisEntry {
                        album_name: "The Dark Side of the Moon".to_string(),
                        review: "masterpiece".to_string(),
                        rate: 10,
                    }],
                },
                "2026-01-02T00:00:00Z",
            )
            .unwrap();

        let band = store.get_band("Pink Floyd").unwrap();
        assert_eq!(band.album_rating("The Dark Side of the Moon"), Some(10));
        let index = store.index_store.load().unwrap();
        assert!(index.bands.iter().find(|b| b.name == "Pink Floyd").unwrap().has_analysis);
    }

    #[test]
    fn removed_band_folder_is_marked_orphaned_on_rescan() {
        let dir = tempdir().unwrap();
        let band_dir = dir.path().join("Metallica");
        touch(&band_dir.join("1983 - Kill 'Em All").join("01.mp3"));
        let store = CollectionStore::new(dir.path());
        store.scan("2026-01-01T00:00:00Z", &CancellationToken::new()).unwrap();

        std::fs::remove_dir_all(&band_dir.join("1983 - Kill 'Em All")).unwrap();
        let report = store.scan("2026-01-02T00:00:00Z", &CancellationToken::new()).unwrap();
        assert_eq!(report.bands_removed, 1);

        let band = store.get_band("Metallica").unwrap();
        assert_eq!(band.albums.len(), 0);
        assert_eq!(band.albums_missing.len(), 1);
    }

    #[test]
    fn cancelled_before_scan_leaves_no_index() {
        let dir = tempdir().unwrap();
        touch(
            &dir.path()
                .join("Pink Floyd")
                .join("1973 - The Dark Side of the Moon")
                .join("01.mp3"),
        );
        let store = CollectionStore::new(dir.path());
        let cancel = CancellationToken::new();
        cancel.cancel();

        match store.scan("2026-01-01T00:00:00Z", &cancel) {
            Err(CoreError::Cancelled(_)) => {}
            other => panic!("expected Cancelled, got {:?}", other.err().map(|e| e.to_string())),
        }
        assert!(!dir.path().join(".collection_index.json").exists());
        assert!(!store.band_store.exists("Pink Floyd"));
    }

    #[test]
    fn validate_band_metadata_never_writes() {
        let dir = tempdir().unwrap();
        let store = CollectionStore::new(dir.path());
        let raw = serde_json::json!({
            "band_name": "Metallica",
            "genre": ["Thrash Metal"],
            "formed": "1981",
            "origin": "LA",
            "members": ["James"],
            "description": "...",
            "albums": []
        });
        let report = store.validate_band_metadata("Metallica", &raw);
        assert!(!report.valid);
        assert!(!store.band_store.exists("Metallica"));
    }
}
