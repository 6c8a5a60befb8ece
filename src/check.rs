//! Command bodies for `init` and `check`.
//!
//! `init` rebuilds the baseline wholesale from the watched directory;
//! `check` diffs the live state against the baseline and writes one
//! bracketed session to the event log.

use crate::baseline::{Baseline, BaselineError};
use crate::diff::{Classification, classify};
use crate::event_log::{EventLog, EventLogError};
use crate::scan::{ScanError, scan_directory};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Baseline error: {0}")]
    Baseline(#[from] BaselineError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Event log error: {0}")]
    EventLog(#[from] EventLogError),
}

#[derive(Debug)]
pub struct InitResult {
    pub files_baselined: usize,
}

/// Rebuilds the baseline from the current contents of the watched
/// directory. The previous baseline is replaced entirely, never merged.
/// Files that cannot be hashed are logged and left out.
pub fn init_baseline(
    dir: &Path,
    baseline_path: &Path,
    log: &mut EventLog,
) -> Result<InitResult, CheckError> {
    let snapshot = scan_directory(dir)?;

    if snapshot.files.is_empty() {
        log.warn(&format!(
            "Watched directory {} is empty; baseline will be empty.",
            dir.display()
        ))?;
    }

    let mut files = BTreeMap::new();
    for (name, digest) in &snapshot.files {
        match digest {
            Some(digest) => {
                files.insert(name.clone(), digest.clone());
                log.info(&format!("File \"{}\" added to baseline.", name))?;
            }
            None => {
                log.warn(&format!("File \"{}\" could not be hashed; not baselined.", name))?;
            }
        }
    }

    let baseline = Baseline::new(files);
    baseline.save(baseline_path)?;

    log.info(&format!("Baseline saved to {}", baseline_path.display()))?;

    Ok(InitResult {
        files_baselined: baseline.files.len(),
    })
}

#[derive(Debug)]
pub struct CheckResult {
    pub classification: Classification,
}

/// Runs one integrity check session.
///
/// The baseline is loaded and the directory scanned before the session
/// start marker is written, so a missing or corrupt baseline aborts
/// without leaving a dangling session in the log. Per-file outcomes are
/// then logged between the reserved start/end markers; their exact
/// wording is what the session reconstructor later matches on.
pub fn check_integrity(
    dir: &Path,
    baseline_path: &Path,
    log: &mut EventLog,
) -> Result<CheckResult, CheckError> {
    let baseline = Baseline::load(baseline_path)?;
    let snapshot = scan_directory(dir)?;
    let classification = classify(&baseline, &snapshot);

    log.session_start()?;

    for name in &classification.verified {
        log.info(&format!("File \"{}\" verified OK.", name))?;
    }
    for name in &classification.modified {
        log.warn(&format!("File \"{}\" integrity failed!", name))?;
        log.alert(&format!("Hash mismatch for \"{}\" confirms tampering.", name))?;
    }
    for name in &classification.deleted {
        log.warn(&format!("File \"{}\" has been DELETED.", name))?;
    }
    for name in &classification.unknown {
        log.alert(&format!("Unknown file \"{}\" detected.", name))?;
    }
    for name in &classification.unreadable {
        log.warn(&format!(
            "File \"{}\" could not be hashed; left unclassified.",
            name
        ))?;
    }

    log.session_end()?;

    Ok(CheckResult { classification })
}
