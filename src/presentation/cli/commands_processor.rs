use crate::core::api::CollectionStore;
use crate::core::domain::{AlbumType, Band, BandAnalysis};
use crate::core::services::query::{AlbumSearchFilters, BandFilters, Pagination, SortKey, SortOrder};
use crate::presentation::cli::commands::{Cli, Commands};
use std::path::PathBuf;

fn resolve_root(cli_root: Option<PathBuf>) -> Result<PathBuf, i32> {
    if let Some(root) = cli_root {
        return Ok(root);
    }
    match std::env::var("MUSIC_ROOT_PATH") {
        Ok(path) => Ok(PathBuf::from(path)),
        Err(_) => {
            eprintln!("error: no music root given; pass --root or set MUSIC_ROOT_PATH");
            Err(1)
        }
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn sort_key_from(raw: &str) -> SortKey {
    match raw.to_ascii_lowercase().as_str() {
        "albums_count" => SortKey::AlbumsCount,
        "last_updated" => SortKey::LastUpdated,
        "completion" => SortKey::Completion,
        _ => SortKey::Name,
    }
}

fn sort_order_from(raw: &str) -> SortOrder {
    if raw.eq_ignore_ascii_case("desc") {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    }
}

/// Dispatch the parsed CLI command. Returns an exit code on failure.
pub fn handle_command(cli: Cli) -> Result<(), i32> {
    let Some(command) = cli.command else {
        return Ok(());
    };
    let root = resolve_root(cli.root)?;
    let store = CollectionStore::new(root);

    match command {
        Commands::Scan => handle_scan(&store),
        Commands::List {
            search,
            genre,
            has_metadata,
            missing_albums,
            sort,
            order,
            page,
            page_size,
        } => handle_list(
            &store,
            search,
            genre,
            has_metadata,
            missing_albums,
            &sort,
            &order,
            page,
            page_size,
        ),
        Commands::Get { band_name } => handle_get(&store, &band_name),
        Commands::SaveMetadata {
            band_name,
            record_file,
        } => handle_save_metadata(&store, &band_name, &record_file),
        Commands::SaveAnalysis {
            band_name,
            analysis_file,
        } => handle_save_analysis(&store, &band_name, &analysis_file),
        Commands::Validate {
            band_name,
            record_file,
        } => handle_validate(&store, &band_name, &record_file),
        Commands::Search {
            album_type,
            year_min,
            year_max,
            is_local,
            rating_min,
        } => handle_search(&store, album_type, year_min, year_max, is_local, rating_min),
        Commands::Analyze => handle_analyze(&store),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), i32> {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            Ok(())
        }
        Err(e) => {
            eprintln!("error: failed to serialize output: {}", e);
            Err(1)
        }
    }
}

fn handle_scan(store: &CollectionStore) -> Result<(), i32> {
    match store.scan(&now(), &crate::core::cancellation::CancellationToken::new()) {
        Ok(report) => print_json(&report),
        Err(e) => {
            eprintln!("error: {}", e);
            Err(1)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_list(
    store: &CollectionStore,
    search: Option<String>,
    genre: Option<String>,
    has_metadata: Option<bool>,
    missing_albums: Option<bool>,
    sort: &str,
    order: &str,
    page: u32,
    page_size: Option<u32>,
) -> Result<(), i32> {
    let filters = BandFilters {
        search_query: search,
        filter_genre: genre,
        filter_has_metadata: has_metadata,
        filter_missing_albums: missing_albums,
    };
    let pagination = Pagination {
        page,
        page_size: page_size.unwrap_or(crate::core::config::DEFAULT_PAGE_SIZE),
    };
    match store.list_bands(
        &filters,
        sort_key_from(sort),
        sort_order_from(order),
        pagination,
        &now(),
    ) {
        Ok(result) => print_json(&result.bands),
        Err(e) => {
            eprintln!("error: {}", e);
            Err(1)
        }
    }
}

fn handle_get(store: &CollectionStore, band_name: &str) -> Result<(), i32> {
    match store.get_band(band_name) {
        Ok(band) => print_json(&band),
        Err(e) => {
            eprintln!("error: {}", e);
            Err(1)
        }
    }
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T, i32> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("error: failed to read {}: {}", path.display(), e);
        1
    })?;
    serde_json::from_str(&content).map_err(|e| {
        eprintln!("error: failed to parse {}: {}", path.display(), e);
        1
    })
}

fn handle_save_metadata(
    store: &CollectionStore,
    band_name: &str,
    record_file: &std::path::Path,
) -> Result<(), i32> {
    let band: Band = read_json_file(record_file)?;
    match store.save_band_metadata(band_name, band, &now()) {
        Ok(report) => {
            println!("saved '{}' at {}", band_name, report.last_updated);
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {}", e);
            Err(1)
        }
    }
}

fn handle_save_analysis(
    store: &CollectionStore,
    band_name: &str,
    analysis_file: &std::path::Path,
) -> Result<(), i32> {
    let analysis: BandAnalysis = read_json_file(analysis_file)?;
    match store.save_band_analysis(band_name, analysis, &now()) {
        Ok(report) => {
            println!("saved analysis for '{}' at {}", band_name, report.last_updated);
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {}", e);
            Err(1)
        }
    }
}

fn handle_validate(
    store: &CollectionStore,
    band_name: &str,
    record_file: &std::path::Path,
) -> Result<(), i32> {
    let raw: serde_json::Value = read_json_file(record_file)?;
    let report = store.validate_band_metadata(band_name, &raw);
    let valid = report.valid;
    print_json(&SerializableReport {
        valid: report.valid,
        issues: report.issues,
    })?;
    if valid { Ok(()) } else { Err(1) }
}

#[derive(serde::Serialize)]
struct SerializableReport {
    valid: bool,
    issues: Vec<crate::core::services::validation::ValidationIssue>,
}

fn handle_search(
    store: &CollectionStore,
    album_type: Option<String>,
    year_min: Option<u32>,
    year_max: Option<u32>,
    is_local: Option<bool>,
    rating_min: Option<u8>,
) -> Result<(), i32> {
    let filters = AlbumSearchFilters {
        album_types: album_type.map(|t| vec![AlbumType::parse(&t)]),
        year_min,
        year_max,
        is_local,
        rating_min,
        ..Default::default()
    };
    match store.search_albums(&filters, &now()) {
        Ok(views) => print_json(&views),
        Err(e) => {
            eprintln!("error: {}", e);
            Err(1)
        }
    }
}

fn handle_analyze(store: &CollectionStore) -> Result<(), i32> {
    match store.analytics(&now()) {
        Ok(insights) => print_json(&insights),
        Err(e) => {
            eprintln!("error: {}", e);
            Err(1)
        }
    }
}
