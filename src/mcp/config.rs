//! Configuration management for the collection store MCP server (§6.5).
//!
//! This module handles environment variable configuration and validation.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// `MUSIC_ROOT_PATH` — required, absolute (§6.5).
    pub music_root_path: PathBuf,
    /// `CACHE_DURATION_DAYS` — informational only; the core never expires state.
    pub cache_duration_days: u32,
    /// `LOG_LEVEL` — standard severity strings.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables. `MUSIC_ROOT_PATH` is
    /// required and must be absolute (§6.5).
    pub fn from_env() -> Result<Self, String> {
        let raw_root = env::var("MUSIC_ROOT_PATH")
            .map_err(|_| "MUSIC_ROOT_PATH environment variable is not set".to_string())?;
        let music_root_path = PathBuf::from(&raw_root);
        if !music_root_path.is_absolute() {
            return Err(format!(
                "MUSIC_ROOT_PATH must be absolute, got '{}'",
                raw_root
            ));
        }

        let cache_duration_days = env::var("CACHE_DURATION_DAYS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(30);

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            music_root_path,
            cache_duration_days,
            log_level,
        })
    }

    pub fn init_logging(&self) {
        crate::core::logging::init_logging(
            self.log_level
                .parse()
                .unwrap_or(log::LevelFilter::Info),
        );
    }
}
