//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bandkeeperctl")]
#[command(about = "Music collection indexer: per-band metadata, a collection index, and analytics.")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Show version information.
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Music collection root. Falls back to `MUSIC_ROOT_PATH`.
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the music root and apply the delta to band records and the index.
    Scan,
    /// List bands with optional filters, sort, and pagination.
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        has_metadata: Option<bool>,
        #[arg(long)]
        missing_albums: Option<bool>,
        /// One of "name", "albums_count", "last_updated", "completion".
        #[arg(long, default_value = "name")]
        sort: String,
        #[arg(long, default_value = "asc")]
        order: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Fetch a single band's full record.
    Get {
        band_name: String,
    },
    /// Save a band's metadata record from a JSON file, validating it first.
    SaveMetadata {
        band_name: String,
        /// Path to a JSON file shaped per the band metadata schema.
        record_file: PathBuf,
    },
    /// Save per-band analysis (review, rating, similar bands) from a JSON file.
    SaveAnalysis {
        band_name: String,
        analysis_file: PathBuf,
    },
    /// Dry-run validate a band record without writing anything.
    Validate {
        band_name: String,
        record_file: PathBuf,
    },
    /// Search albums across the collection.
    Search {
        #[arg(long)]
        album_type: Option<String>,
        #[arg(long)]
        year_min: Option<u32>,
        #[arg(long)]
        year_max: Option<u32>,
        #[arg(long)]
        is_local: Option<bool>,
        #[arg(long)]
        rating_min: Option<u8>,
    },
    /// Compute collection-wide analytics.
    Analyze,
}
