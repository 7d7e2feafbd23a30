//! Band Metadata Store (C3): the single source of truth per band (§4.3).

use crate::core::domain::{Album, Band};
use crate::core::errors::CoreError;
use crate::core::locks::BandLocks;
use crate::core::logging::{log_band_save, log_validation_operation};
use crate::core::services::atomic_writer::write_json_atomic;
use crate::core::services::scanner::BandScanResult;
use crate::core::services::validation::{unrecognized_album_type_warning, validate_invariants};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const BAND_METADATA_FILE_NAME: &str = ".band_metadata.json";

pub struct BandStore {
    root: PathBuf,
    locks: Arc<BandLocks>,
}

pub struct SaveReport {
    pub last_updated: String,
    pub checksum: String,
}

pub struct ApplyScanReport {
    pub record: Band,
    pub changed: bool,
    /// Unrecognized `"type"` strings found on the record already on disk
    /// before this scan's delta was applied (§3: "unknown strings coerce to
    /// `Album` with a warning recorded in the scan delta").
    pub type_warnings: Vec<String>,
}

/// Reads the raw `"type"` string of every album on an existing band file
/// (local and missing) and flags any that won't round-trip through
/// [`crate::core::domain::AlbumType`] unchanged. `AlbumType::deserialize`
/// coerces an unrecognized spelling silently, so this inspects the JSON
/// value before it is lost to a typed `Band`.
fn scan_raw_type_warnings(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(&content) else {
        return Vec::new();
    };

    ["albums", "albums_missing"]
        .iter()
        .flat_map(|list_field| {
            value
                .get(list_field)
                .and_then(|v| v.as_array())
                .into_iter()
                .flatten()
        })
        .filter_map(|album| album.get("type").and_then(|t| t.as_str()))
        .filter_map(unrecognized_album_type_warning)
        .collect()
}

impl BandStore {
    pub fn new(root: impl Into<PathBuf>, locks: Arc<BandLocks>) -> Self {
        BandStore {
            root: root.into(),
            locks,
        }
    }

    pub fn band_dir(&self, band_name: &str) -> PathBuf {
        self.root.join(band_name)
    }

    pub fn band_file_path(&self, band_name: &str) -> PathBuf {
        self.band_dir(band_name).join(BAND_METADATA_FILE_NAME)
    }

    /// `Load(band)`: reads the sidecar file. No lock is taken — readers
    /// reread on demand and tolerate a concurrent atomic replace (§5).
    pub fn load(&self, band_name: &str) -> Result<Band, CoreError> {
        let path = self.band_file_path(band_name);
        if !path.exists() {
            return Err(CoreError::NotFound(format!("band '{}'", band_name)));
        }
        let content = std::fs::read_to_string(&path)?;
        let mut band: Band = serde_json::from_str(&content)
            .map_err(|e| CoreError::Corrupt(format!("{}: {}", path.display(), e)))?;
        band.albums_count = Some(band.total_albums() as u32);
        Ok(band)
    }

    pub fn exists(&self, band_name: &str) -> bool {
        self.band_file_path(band_name).exists()
    }

    /// `Save(band, record)`: validates, stamps `last_updated`, writes
    /// atomically. All-or-nothing — validation runs before any file is
    /// touched (§7).
    pub fn save(&self, band_name: &str, mut record: Band, now: &str) -> Result<SaveReport, CoreError> {
        let issues = validate_invariants(&record);
        log_validation_operation(band_name, issues.len());
        if !issues.is_empty() {
            return Err(CoreError::validation_with_hints(
                format!("band '{}' failed validation", band_name),
                issues.iter().filter_map(issue_hint).collect(),
            ));
        }

        let _guard = self.locks.lock_for(band_name).lock().unwrap_or_else(|e| e.into_inner());
        record.last_updated = now.to_string();
        record.albums_count = Some(record.total_albums() as u32);
        let path = self.band_file_path(band_name);
        let report = write_json_atomic(&path, &record)?;
        log_band_save(band_name, true);
        Ok(SaveReport {
            last_updated: now.to_string(),
            checksum: report.checksum,
        })
    }

    /// `SaveAnalysis(band, analysis)`: the band must already exist.
    pub fn save_analysis(
        &self,
        band_name: &str,
        analysis: crate::core::domain::BandAnalysis,
        now: &str,
    ) -> Result<SaveReport, CoreError> {
        let mut record = self.load(band_name)?;
        record.analyze = Some(analysis);
        self.save(band_name, record, now)
    }

    /// `ApplyScan(band, delta)`: the merge contract that preserves
    /// human-provided enrichment (§4.3). Band-level fields are untouched.
    pub fn apply_scan(&self, scan: &BandScanResult, now: &str) -> Result<ApplyScanReport, CoreError> {
        let type_warnings = scan_raw_type_warnings(&self.band_file_path(&scan.band_name));
        let mut record = match self.load(&scan.band_name) {
            Ok(band) => band,
            Err(CoreError::NotFound(_)) => Band::new(scan.band_name.clone()),
            Err(e) => return Err(e),
        };

        let previous_local: HashMap<_, _> = record
            .albums
            .iter()
            .map(|a| (a.key(), a.clone()))
            .collect();
        let previous_missing: HashMap<_, _> = record
            .albums_missing
            .iter()
            .map(|a| (a.key(), a.clone()))
            .collect();

        let mut new_local = Vec::with_capacity(scan.albums.len());
        let mut scanned_keys = std::collections::HashSet::new();

        for scanned in &scan.albums {
            let album = Album {
                album_name: scanned.title.clone(),
                year: scanned.year.clone(),
                album_type: scanned.album_type,
                edition: scanned.edition.clone(),
                track_count: scanned.track_count,
                duration: None,
                genres: Vec::new(),
                folder_path: Some(scanned.folder_path.clone()),
            };
            let key = album.key();
            scanned_keys.insert(key.clone());

            // Carry forward genres/duration enrichment regardless of which
            // list the album previously sat in; disk-derived fields
            // (track_count, folder_path, parsed attrs) always come from
            // the fresh scan.
            let carried_genres = previous_local
                .get(&key)
                .or_else(|| previous_missing.get(&key))
                .map(|a| a.genres.clone())
                .unwrap_or_default();
            let carried_duration = previous_local
                .get(&key)
                .or_else(|| previous_missing.get(&key))
                .and_then(|a| a.duration.clone());

            new_local.push(Album {
                genres: carried_genres,
                duration: carried_duration,
                ..album
            });
        }

        // Previously local but now absent: move to missing, keep enrichment.
        let mut new_missing: Vec<Album> = previous_local
            .iter()
            .filter(|(key, _)| !scanned_keys.contains(*key))
            .map(|(_, album)| {
                let mut moved = album.clone();
                moved.folder_path = None;
                moved
            })
            .collect();

        // Previously missing and still absent: preserved verbatim.
        new_missing.extend(
            previous_missing
                .iter()
                .filter(|(key, _)| !scanned_keys.contains(*key))
                .map(|(_, album)| album.clone()),
        );

        new_local.sort_by(|a, b| a.album_name.cmp(&b.album_name).then(a.year.cmp(&b.year)));
        new_missing.sort_by(|a, b| a.album_name.cmp(&b.album_name).then(a.year.cmp(&b.year)));

        let changed = new_local != record.albums || new_missing != record.albums_missing;

        record.albums = new_local;
        record.albums_missing = new_missing;
        record.folder_path = Some(scan.folder_path.clone());

        if changed {
            let saved = self.save(&scan.band_name, record.clone(), now)?;
            record.last_updated = saved.last_updated;
            record.albums_count = Some(record.total_albums() as u32);
        }

        Ok(ApplyScanReport {
            record,
            changed,
            type_warnings,
        })
    }

    /// Marks every previously-local album as missing when a band's folder
    /// has disappeared from disk (§3 Lifecycle: "a missing folder converts
    /// all previously-local albums into missing albums").
    pub fn mark_orphaned(&self, band_name: &str, now: &str) -> Result<ApplyScanReport, CoreError> {
        let type_warnings = scan_raw_type_warnings(&self.band_file_path(band_name));
        let mut record = self.load(band_name)?;
        let changed = !record.albums.is_empty();
        let mut moved: Vec<Album> = record
            .albums
            .drain(..)
            .map(|mut a| {
                a.folder_path = None;
                a
            })
            .collect();
        record.albums_missing.append(&mut moved);
        record
            .albums_missing
            .sort_by(|a, b| a.album_name.cmp(&b.album_name).then(a.year.cmp(&b.year)));
        if changed {
            let saved = self.save(band_name, record.clone(), now)?;
            record.last_updated = saved.last_updated;
        }
        Ok(ApplyScanReport {
            record,
            changed,
            type_warnings,
        })
    }

    pub fn list_band_names(&self) -> Result<Vec<String>, CoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            let is_dot = path
                .file_name()
                .map(|n| n.to_string_lossy().starts_with('.'))
                .unwrap_or(true);
            if path.is_dir() && !is_dot && path.join(BAND_METADATA_FILE_NAME).exists() {
                names.push(path.file_name().unwrap().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn issue_hint(
    issue: &crate::core::services::validation::ValidationIssue,
) -> Option<crate::core::errors::RemediationHint> {
    issue
        .suggestion
        .as_ref()
        .map(|s| crate::core::errors::RemediationHint::new(issue.field.clone(), s.clone()))
}
