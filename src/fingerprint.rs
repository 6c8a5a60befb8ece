use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
}

/// Computes the SHA-256 fingerprint of a file's contents.
///
/// Reads the file in fixed-size chunks so arbitrarily large files can be
/// fingerprinted without loading them into memory. The digest is returned
/// as a lowercase hex string.
///
/// # Errors
/// - `FingerprintError::Io`: File doesn't exist or other I/O errors
///   (including a file vanishing between discovery and read)
/// - `FingerprintError::PermissionDenied`: Insufficient permissions to read
///   the file
pub fn fingerprint_file(path: &Path) -> Result<String, FingerprintError> {
    let mut file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            FingerprintError::PermissionDenied(path.to_path_buf())
        } else {
            FingerprintError::Io(e)
        }
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(FingerprintError::Io)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let digest = format!("{:x}", hasher.finalize());

    debug!("Fingerprint of {} is {}", path.display(), digest);

    Ok(digest)
}
