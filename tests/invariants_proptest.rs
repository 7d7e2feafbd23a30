//! Property tests for the invariants in §8: scanner idempotence and the
//! band-record save/load round trip.

use band_keeper::core::cancellation::CancellationToken;
use band_keeper::core::domain::Band;
use band_keeper::core::locks::BandLocks;
use band_keeper::core::services::band_store::BandStore;
use band_keeper::core::services::scanner::scan_root;
use proptest::prelude::*;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

fn band_name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z ]{0,12}".prop_filter("non-blank", |s| !s.trim().is_empty())
}

fn track_count_strategy() -> impl Strategy<Value = u32> {
    1u32..20
}

proptest! {
    /// Scanning the same, unchanged tree twice yields the same set of band
    /// names and per-band album counts (§8 "scanner idempotence").
    #[test]
    fn scan_is_idempotent(band in band_name_strategy(), year in 1950u32..2030, tracks in track_count_strategy()) {
        let dir = tempdir().unwrap();
        let album_dir = dir.path().join(band.trim()).join(format!("{} - Some Album", year));
        for i in 0..tracks {
            let file = album_dir.join(format!("{:02}.mp3", i));
            fs::create_dir_all(file.parent().unwrap()).unwrap();
            fs::write(&file, b"x").unwrap();
        }

        let first = scan_root(dir.path(), &CancellationToken::new()).unwrap();
        let second = scan_root(dir.path(), &CancellationToken::new()).unwrap();

        prop_assert_eq!(first.bands.len(), second.bands.len());
        for (a, b) in first.bands.iter().zip(second.bands.iter()) {
            prop_assert_eq!(&a.band_name, &b.band_name);
            prop_assert_eq!(a.albums.len(), b.albums.len());
        }
    }

    /// Saving a band record and loading it back yields the same logical
    /// content (§8 "round trip").
    #[test]
    fn band_record_round_trips_through_save_and_load(band_name in band_name_strategy()) {
        let dir = tempdir().unwrap();
        let locks = Arc::new(BandLocks::new());
        let store = BandStore::new(dir.path(), locks);

        let band = Band::new(band_name.trim().to_string());
        store.save(band_name.trim(), band.clone(), "2026-01-01T00:00:00Z").unwrap();
        let loaded = store.load(band_name.trim()).unwrap();

        prop_assert_eq!(loaded.band_name, band.band_name);
        prop_assert_eq!(loaded.albums.len(), band.albums.len());
        prop_assert_eq!(loaded.albums_missing.len(), band.albums_missing.len());
    }
}
