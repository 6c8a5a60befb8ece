//! Non-recursive scan of the watched directory.
//!
//! Only the immediate regular files of the directory are considered;
//! subdirectories, symlinks and other entry types are ignored. The scan
//! produces a transient snapshot of filename -> fingerprint that is never
//! persisted, only diffed against the baseline.

use crate::fingerprint::fingerprint_file;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("watched directory {0} not found")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
}

/// Live state of the watched directory at scan time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Filename -> digest. `None` records a file that was present but could
    /// not be read when we tried to fingerprint it.
    pub files: BTreeMap<String, Option<String>>,
}

/// Fingerprints every regular file directly inside `dir`.
///
/// A file that fails to hash (vanished mid-scan, unreadable) stays in the
/// snapshot with an absent digest; the failure is logged and never aborts
/// the scan. Only a failure to list the directory itself is an error.
pub fn scan_directory(dir: &Path) -> Result<Snapshot, ScanError> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ScanError::NotFound(dir.to_path_buf()),
        ErrorKind::PermissionDenied => ScanError::PermissionDenied(dir.to_path_buf()),
        _ => ScanError::Io(e),
    })?;

    let mut files = BTreeMap::new();

    for entry in read_dir {
        let entry = entry.map_err(ScanError::Io)?;
        let path = entry.path();

        // symlink_metadata so a symlink to a file is not followed and
        // therefore not treated as a regular file.
        let metadata = std::fs::symlink_metadata(&path).map_err(|e| {
            if e.kind() == ErrorKind::PermissionDenied {
                ScanError::PermissionDenied(path.clone())
            } else {
                ScanError::Io(e)
            }
        })?;

        if !metadata.file_type().is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!("Skipping file with non-UTF-8 name: {}", path.display());
            continue;
        };

        let digest = match fingerprint_file(&path) {
            Ok(digest) => Some(digest),
            Err(e) => {
                warn!("Could not fingerprint {}: {}", path.display(), e);
                None
            }
        };

        files.insert(name.to_string(), digest);
    }

    Ok(Snapshot { files })
}
