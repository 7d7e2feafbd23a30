//! Logging helpers for the collection store.

use log::LevelFilter;

/// Initialize application logging with the specified level.
pub fn init_logging(level: LevelFilter) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.to_string()))
        .init();
}

/// Log a scan operation's outcome (target: `band_keeper::scan`).
pub fn log_scan_operation(root: &std::path::Path, bands_added: usize, bands_removed: usize, albums_changed: usize) {
    log::info!(
        target: "band_keeper::scan",
        "scanned {}: +{} bands, -{} bands, {} albums changed",
        root.display(),
        bands_added,
        bands_removed,
        albums_changed
    );
}

pub fn log_scan_band_error(band_name: &str, error: &dyn std::error::Error) {
    log::warn!(target: "band_keeper::scan", "skipping band '{}': {}", band_name, error);
}

/// Log a band-file load/save outcome (target: `band_keeper::store`).
pub fn log_band_save(band_name: &str, success: bool) {
    if success {
        log::info!(target: "band_keeper::store", "saved band '{}'", band_name);
    } else {
        log::error!(target: "band_keeper::store", "failed to save band '{}'", band_name);
    }
}

pub fn log_validation_operation(band_name: &str, errors_count: usize) {
    if errors_count > 0 {
        log::warn!(target: "band_keeper::store", "validation for '{}': {} errors", band_name, errors_count);
    } else {
        log::info!(target: "band_keeper::store", "validation passed for '{}'", band_name);
    }
}

/// Log an index rebuild (target: `band_keeper::index`).
pub fn log_index_rebuild(bands: usize, excluded: usize) {
    if excluded > 0 {
        log::warn!(target: "band_keeper::index", "rebuilt index from {} bands, excluded {} corrupt", bands, excluded);
    } else {
        log::info!(target: "band_keeper::index", "rebuilt index from {} bands", bands);
    }
}

/// Log an atomic write step (target: `band_keeper::atomic_write`).
pub fn log_atomic_write(path: &std::path::Path, success: bool) {
    if success {
        log::debug!(target: "band_keeper::atomic_write", "wrote {}", path.display());
    } else {
        log::error!(target: "band_keeper::atomic_write", "failed to write {}", path.display());
    }
}

pub fn log_error_with_context(context: &str, error: &dyn std::error::Error) {
    log::error!("error in {}: {}", context, error);
}
