//! Filesystem Scanner (C2): walks the music root and enumerates bands and
//! albums (§4.2). Writes nothing; callers (C8) feed the result through
//! the Band Metadata Store (C3) to compute and apply deltas.

use crate::core::cancellation::CancellationToken;
use crate::core::config::is_music_extension;
use crate::core::errors::CoreError;
use crate::core::services::path_normalizer::{
    FolderStructure, classify_folder_structure, classify_type_subfolder, parse_album_folder,
};
use crate::core::domain::AlbumType;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq)]
pub struct AlbumScanResult {
    pub title: String,
    pub year: String,
    pub edition: String,
    pub album_type: AlbumType,
    pub track_count: u32,
    /// Relative to the band folder.
    pub folder_path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandScanResult {
    pub band_name: String,
    /// Relative to the music root.
    pub folder_path: String,
    pub albums: Vec<AlbumScanResult>,
    pub structure: FolderStructure,
    pub compliance_score: f64,
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub bands: Vec<BandScanResult>,
    /// Band name -> error message, for unreadable band directories that
    /// were skipped rather than aborting the whole scan (§4.2).
    pub band_errors: Vec<(String, String)>,
}

/// Enumerates every band candidate directly under `root` (a directory whose
/// name does not start with `.`), in deterministic (sorted) order.
///
/// `cancel` is checked before the walk begins and again before each band
/// directory is scanned (§5): on cancellation, returns `CoreError::Cancelled`
/// instead of a partial `ScanOutcome`, so a caller never applies a delta
/// built from a half-finished walk.
pub fn scan_root(root: &Path, cancel: &CancellationToken) -> Result<ScanOutcome, CoreError> {
    if cancel.is_cancelled() {
        return Err(CoreError::Cancelled("scan cancelled before starting".to_string()));
    }

    let mut candidates: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CoreError::Io(format!("reading music root {}: {}", root.display(), e)))?
        .into_iter()
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .filter(|p| !is_dot_prefixed(p))
        .collect();
    candidates.sort();

    let mut bands = Vec::new();
    let mut band_errors = Vec::new();

    for band_dir in candidates {
        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled("scan cancelled during directory walk".to_string()));
        }
        let band_name = band_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match scan_band_dir(root, &band_dir, &band_name) {
            Ok(result) => bands.push(result),
            Err(e) => band_errors.push((band_name, e.to_string())),
        }
    }

    Ok(ScanOutcome { bands, band_errors })
}

fn is_dot_prefixed(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Walks one band directory to the type-subfolder-bounded depth (§4.1, §4.2):
/// a leaf directory with >= 1 direct music file is an album; type
/// subfolders are descended exactly one level and not themselves albums.
fn scan_band_dir(
    root: &Path,
    band_dir: &Path,
    band_name: &str,
) -> Result<BandScanResult, CoreError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(band_dir)
        .map_err(|e| CoreError::Io(format!("reading band dir {}: {}", band_dir.display(), e)))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir() && !is_dot_prefixed(p))
        .collect();
    entries.sort();

    let mut albums = Vec::new();
    let mut album_is_direct = Vec::new();

    for entry in entries {
        let entry_name = entry
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(subfolder_type) = classify_type_subfolder(&entry_name) {
            // Type subfolder: descend exactly one more level for albums.
            let mut sub_entries: Vec<PathBuf> = match fs::read_dir(&entry) {
                Ok(rd) => rd.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
                Err(_) => continue,
            };
            sub_entries.retain(|p| p.is_dir() && !is_dot_prefixed(p));
            sub_entries.sort();

            for album_dir in sub_entries {
                if let Some(album) = classify_album_dir(band_dir, &album_dir, Some(subfolder_type))
                {
                    albums.push(album);
                    album_is_direct.push(false);
                }
            }
        } else if let Some(album) = classify_album_dir(band_dir, &entry, None) {
            albums.push(album);
            album_is_direct.push(true);
        }
        // Neither a type subfolder nor a leaf with music files: not an
        // album candidate at all (§4.2 only descends the bounded depth).
    }

    // Depth is bounded structurally: at most one type-subfolder level is
    // descended before treating a directory as an album leaf (§4.1, §4.2).
    let (structure, compliance_score) = classify_folder_structure(&album_is_direct);

    let folder_path = band_dir
        .strip_prefix(root)
        .unwrap_or(band_dir)
        .to_string_lossy()
        .into_owned();

    Ok(BandScanResult {
        band_name: band_name.to_string(),
        folder_path,
        albums,
        structure,
        compliance_score,
    })
}

/// If `dir` directly contains >= 1 music file, classifies it as an album.
/// On an I/O error reading the directory, degrades to `track_count: 0`
/// rather than failing the whole band (§4.2).
fn classify_album_dir(
    band_dir: &Path,
    dir: &Path,
    type_subfolder: Option<AlbumType>,
) -> Option<AlbumScanResult> {
    let track_count = match fs::read_dir(dir) {
        Ok(rd) => rd
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(is_music_extension)
                    .unwrap_or(false)
            })
            .count() as u32,
        // Unreadable album directory: degrade to track_count 0 with a
        // warning rather than failing the whole band (§4.2).
        Err(e) => {
            log::warn!(target: "band_keeper::scan", "unreadable album dir {}: {}", dir.display(), e);
            track_count
        }
    };

    // An album is a leaf directory with >= 1 direct music file, uniformly,
    // whether or not a type subfolder sits above it (§4.2).
    if track_count == 0 {
        return None;
    }

    let dir_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parsed = parse_album_folder(&dir_name, type_subfolder);

    let folder_path = dir
        .strip_prefix(band_dir)
        .unwrap_or(dir)
        .to_string_lossy()
        .into_owned();

    Some(AlbumScanResult {
        title: parsed.title,
        year: parsed.year,
        edition: parsed.edition,
        album_type: parsed.album_type,
        track_count,
        folder_path,
    })
}
