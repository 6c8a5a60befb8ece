//! Persistence of the trusted baseline: a key-sorted mapping of filename to
//! content fingerprint, stored as a versioned TOML document.
//!
//! The baseline is always written as a whole (initialization replaces it
//! entirely, never merges) and loaded as a whole. A missing file and a
//! corrupt file are distinct, user-actionable conditions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    #[error("baseline file {0} not found (run 'dirsentry init' to create one)")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("baseline is corrupt: {0}")]
    Corrupt(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Unsupported baseline version: {0}")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Metadata {
    version: u32,
}

/// Helper struct to extract only the metadata section from a TOML file,
/// ignoring all other content. Used to check version before parsing the full
/// file. Note: We explicitly do NOT use deny_unknown_fields here, as this
/// struct's purpose is to ignore everything except metadata.
#[derive(Debug, Deserialize)]
struct MetadataOnly {
    metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Baseline {
    metadata: Metadata,
    /// Filename (no path separators) -> lowercase hex SHA-256 digest.
    /// BTreeMap keeps the serialized form key-sorted and human-diffable.
    pub files: BTreeMap<String, String>,
}

impl Baseline {
    const SUPPORTED_VERSION: u32 = 1;

    /// Create a new Baseline with the current supported version
    pub fn new(files: BTreeMap<String, String>) -> Self {
        Baseline {
            metadata: Metadata {
                version: Self::SUPPORTED_VERSION,
            },
            files,
        }
    }

    /// Parse a TOML string into a Baseline structure
    pub fn from_toml(content: &str) -> Result<Self, BaselineError> {
        // First, extract only the metadata to check version. Otherwise
        // we would fail on unexpected *other* input (which could just be
        // due to a future version), without being able to provide a sensible
        // explanation.
        let metadata_only: MetadataOnly = toml::from_str(content)?;

        if metadata_only.metadata.version != Self::SUPPORTED_VERSION {
            return Err(BaselineError::UnsupportedVersion(
                metadata_only.metadata.version,
            ));
        }

        // Version is supported, now parse the full file
        let baseline: Baseline = toml::from_str(content)?;
        Ok(baseline)
    }

    /// Serialize a Baseline structure to TOML string
    pub fn to_toml(&self) -> Result<String, BaselineError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a Baseline from the filesystem.
    ///
    /// A missing file is reported as `BaselineError::NotFound` so callers can
    /// tell the user to initialize, rather than treating it as corruption.
    pub fn load(path: &Path) -> Result<Self, BaselineError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BaselineError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => {
                BaselineError::PermissionDenied(path.to_path_buf())
            }
            _ => BaselineError::Io(e),
        })?;

        Self::from_toml(&content)
    }

    /// Save a Baseline to the filesystem atomically.
    ///
    /// Writes to a temporary file, fsyncs it, then atomically renames it into place.
    pub fn save(&self, path: &Path) -> Result<(), BaselineError> {
        use std::io::Write;

        let content = self.to_toml()?;

        let parent = path.parent().unwrap_or(Path::new("."));

        let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                BaselineError::PermissionDenied(parent.to_path_buf())
            } else {
                BaselineError::Io(e)
            }
        })?;

        temp_file.write_all(content.as_bytes()).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                BaselineError::PermissionDenied(path.to_path_buf())
            } else {
                BaselineError::Io(e)
            }
        })?;

        temp_file.as_file().sync_all().map_err(BaselineError::Io)?;

        temp_file.persist(path).map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::PermissionDenied {
                BaselineError::PermissionDenied(path.to_path_buf())
            } else {
                BaselineError::Io(e.error)
            }
        })?;

        Ok(())
    }
}
