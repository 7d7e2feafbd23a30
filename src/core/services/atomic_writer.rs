//! Durable JSON writes: write-temp, fsync, rename, fsync parent (§4.7).

use crate::core::domain::with_schema_version;
use crate::core::errors::CoreError;
use crate::core::logging::log_atomic_write;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::path::Path;

/// Result of a successful atomic write: the final serialization's checksum,
/// used by the collection index (§4.7) and by backup validation external to
/// the core.
pub struct WriteReport {
    pub checksum: String,
}

/// Serializes `value` (wrapped with the on-disk schema-version envelope),
/// stable key order + 2-space indent, and durably replaces `path`.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<WriteReport, CoreError> {
    let wrapped = with_schema_version(value);
    let content = serde_json::to_vec_pretty(&wrapped)?;
    write_bytes_atomic(path, &content)
}

fn write_bytes_atomic(path: &Path, content: &[u8]) -> Result<WriteReport, CoreError> {
    let parent = path.parent().ok_or_else(|| {
        CoreError::Internal(format!("path '{}' has no parent directory", path.display()))
    })?;
    fs::create_dir_all(parent)?;

    let tmp_path = tmp_path_for(path);
    let result = (|| -> Result<(), std::io::Error> {
        let file = File::create(&tmp_path)?;
        {
            use std::io::Write;
            let mut file = &file;
            file.write_all(content)?;
        }
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        log_atomic_write(path, false);
        return Err(e.into());
    }

    log_atomic_write(path, true);
    let mut hasher = Sha256::new();
    hasher.update(content);
    let checksum = format!("{:x}", hasher.finalize());
    Ok(WriteReport { checksum })
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.tmp", file_name))
}
